//////////////////////////////////////////////////
// Entry point

#[cfg(not(target_os = "android"))]
fn main() {
    pgdce_host_app::main();
}

#[cfg(target_os = "android")]
fn main() {}
