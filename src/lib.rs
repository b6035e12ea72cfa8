//////////////////////////////////////////////////
// Module

pub mod activity;
pub mod app;
pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod file;
pub mod input;
pub mod notice;
pub mod opengl;
pub mod renderer;
pub mod surface;

#[cfg(target_os = "android")]
mod android;

//////////////////////////////////////////////////
// OpenGL binding

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

//////////////////////////////////////////////////
// Prelude

pub mod prelude {
    pub use crate::activity::MainActivity;
    pub use crate::capability::DeviceInfo;
    pub use crate::config::{GlDebugFlags, HostConfig};
    #[cfg(all(target_os = "android", feature = "pgdce"))]
    pub use crate::engine::NativeEngine;
    pub use crate::engine::{AssetManagerHandle, Engine};
    pub use crate::error::HostError;
    pub use crate::input::{KeyEvent, MotionEvent};
    pub use crate::Host;
    #[cfg(target_os = "android")]
    pub use winit::platform::android::activity::AndroidApp;
}

//////////////////////////////////////////////////
// Using

use std::rc::Rc;

use log::LevelFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;
#[cfg(target_os = "android")]
use winit::platform::android::EventLoopBuilderExtAndroid;

use crate::activity::MainActivity;
use crate::capability::DeviceInfo;
use crate::config::HostConfig;
use crate::engine::Engine;
use crate::error::{HostError, Result};
use crate::file::Files;
use crate::input::{KeyEvent, TouchTracker};
use crate::notice::Notice;
use crate::surface::{GlSurfaceView, SurfaceView};

//////////////////////////////////////////////////
// Types

pub type Gl = Rc<gl::Gles2>;

//////////////////////////////////////////////////
// Definition

/// Runs an engine inside the platform event loop.
pub struct Host<E: Engine> {
    activity: MainActivity<E>,
    surface: Option<GlSurfaceView>,
    touch_tracker: TouchTracker,
    config: HostConfig,
    exit_state: Result<()>,
    #[cfg(target_os = "android")]
    android_app: AndroidApp,
}

//////////////////////////////////////////////////
// Implementation

#[cfg(target_os = "android")]
impl<E: Engine> Host<E> {
    pub fn new(android_app: AndroidApp, engine: E) -> Self {
        let notice: Box<dyn Notice> = Box::new(notice::ToastNotice::new(android_app.clone()));
        Self {
            activity: MainActivity::new(engine, notice),
            surface: None,
            touch_tracker: TouchTracker::new(),
            config: HostConfig::default(),
            exit_state: Ok(()),
            android_app,
        }
    }

    pub fn with_logging(self, level_filter: LevelFilter) -> Self {
        android_logger::init_once(android_logger::Config::default().with_max_level(level_filter));
        self
    }

    pub fn files(&self) -> Files {
        Files::new(&self.android_app)
    }

    fn device_info(&self) -> Result<DeviceInfo> {
        DeviceInfo::query(&self.android_app)
    }

    fn event_loop(&self) -> Result<EventLoop<()>> {
        Ok(EventLoop::builder().with_android_app(self.android_app.clone()).build()?)
    }
}

#[cfg(not(target_os = "android"))]
impl<E: Engine> Host<E> {
    pub fn new(engine: E) -> Self {
        let notice: Box<dyn Notice> = Box::new(notice::LogNotice);
        Self {
            activity: MainActivity::new(engine, notice),
            surface: None,
            touch_tracker: TouchTracker::new(),
            config: HostConfig::default(),
            exit_state: Ok(()),
        }
    }

    pub fn with_logging(self, level_filter: LevelFilter) -> Self {
        // a second host in the same process keeps the first logger
        let _ = env_logger::builder()
            .filter_level(level_filter) // Default Log Level
            .parse_default_env()
            .try_init();
        self
    }

    pub fn files(&self) -> Files {
        Files::new()
    }

    fn device_info(&self) -> Result<DeviceInfo> {
        DeviceInfo::query()
    }

    fn event_loop(&self) -> Result<EventLoop<()>> {
        Ok(EventLoop::builder().build()?)
    }
}

impl<E: Engine> Host<E> {
    pub fn with_config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates the activity and runs the event loop until the activity finishes.
    pub fn run(mut self) -> Result<()> {
        log::info!("Initializing application...");
        let event_loop = self.event_loop()?;
        self.create()?;

        log::info!("Running event loop...");
        event_loop.run_app(&mut self)?;
        self.exit_state
    }

    fn create(&mut self) -> Result<()> {
        let device = self.device_info()?;
        let files = self.files();
        let assets = files.asset_manager_handle()?;
        let engine_config = self.config.engine_config(&files);

        match self.activity.create(&device, &assets, engine_config.as_deref()) {
            Ok(setup) => {
                self.surface = Some(GlSurfaceView::new(setup, &self.config));
                Ok(())
            }
            // the screen stays empty, lifecycle events still reach the engine
            Err(HostError::Es2Unsupported) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: HostError) {
        log::error!("{}", err);
        self.exit_state = Err(err);
        event_loop.exit();
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Finishing activity...");
        event_loop.exit();
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &winit::event::KeyEvent) {
        let Ok(key) = KeyEvent::try_from(event) else {
            return;
        };
        if self.activity.key(&key) {
            self.finish(event_loop);
        }
    }

    fn on_touch(&mut self, event_loop: &ActiveEventLoop, touch: winit::event::Touch) {
        let origin = self.surface_origin(event_loop);
        for event in self.touch_tracker.track(touch.into()) {
            self.activity.touch(&event, origin);
        }
    }

    fn surface_origin(&mut self, event_loop: &ActiveEventLoop) -> input::Location {
        self.surface.as_mut().map(|surface| surface.bind(event_loop).origin()).unwrap_or_default()
    }
}

impl<E: Engine> ApplicationHandler for Host<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let mut surface = self.surface.as_mut().map(|surface| surface.bind(event_loop));
        let result = self.activity.resume(surface.as_mut().map(|surface| surface as &mut dyn SurfaceView));
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        let mut surface = self.surface.as_mut().map(|surface| surface.bind(event_loop));
        self.activity.pause(surface.as_mut().map(|surface| surface as &mut dyn SurfaceView));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: winit::window::WindowId, event: WindowEvent) {
        match event {
            WindowEvent::RedrawRequested => {
                if let Some(surface) = self.surface.as_mut() {
                    self.activity.draw_frame(&mut surface.bind(event_loop));
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    self.activity.resize(&mut surface.bind(event_loop), size.width, size.height);
                }
            }
            WindowEvent::Touch(touch) => self.on_touch(event_loop, touch),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),
            WindowEvent::CloseRequested => self.finish(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let origin = self.surface_origin(event_loop);
        if let Some(event) = self.touch_tracker.flush() {
            self.activity.touch(&event, origin);
        }
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        self.activity.low_memory();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Exiting application...");
        if let Some(surface) = self.surface.as_mut() {
            surface.exit();
        }
        self.surface = None;
    }
}

//////////////////////////////////////////////////
// Traits

impl std::fmt::Debug for gl::Gles2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gles2").finish()
    }
}
