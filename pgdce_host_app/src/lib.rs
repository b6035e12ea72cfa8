//////////////////////////////////////////////////
// Using

pub mod trace_engine;

use pgdce_host::prelude::*;

//////////////////////////////////////////////////
// Entry point for android

#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: AndroidApp) {
    #[cfg(feature = "pgdce")]
    let engine = match NativeEngine::new(&app) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Failed to bind native engine: {}", err);
            return;
        }
    };
    #[cfg(not(feature = "pgdce"))]
    let engine = trace_engine::TraceEngine::new();

    // start activity
    let host = Host::new(app, engine).with_logging(log::LevelFilter::Trace);
    if let Err(err) = host.run() {
        log::error!("Activity terminated: {}", err);
    }
}

// declared as pub to avoid dead_code warnings from cdylib target build
#[cfg(not(target_os = "android"))]
pub fn main() {
    let config = HostConfig::default().with_title("PGDCE");
    let host = Host::new(trace_engine::TraceEngine::new()).with_config(config).with_logging(log::LevelFilter::Debug);
    if let Err(err) = host.run() {
        log::error!("Activity terminated: {}", err);
    }
}
