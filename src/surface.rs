//////////////////////////////////////////////////
// Using

use winit::event_loop::ActiveEventLoop;

use crate::app::App;
use crate::capability::SurfaceSetup;
use crate::config::{GlDebugFlags, HostConfig};
use crate::error::Result;
use crate::input::Location;
use crate::opengl::check_error;
use crate::renderer::Renderer;
use crate::Gl;

//////////////////////////////////////////////////
// Traits

/// The rendering surface owned by the activity.
///
/// Surface callbacks reach the engine through the renderer passed in.
pub trait SurfaceView {
    fn on_pause(&mut self);

    fn on_resume(&mut self, renderer: &mut dyn Renderer) -> Result<()>;

    fn resize(&mut self, width: u32, height: u32, renderer: &mut dyn Renderer);

    fn render(&mut self, renderer: &mut dyn Renderer);

    /// Top left of the surface in the coordinate space of touch events.
    fn origin(&self) -> Location;
}

/// Where the surface debug flags send their output.
pub trait GlDebugOutput {
    fn log_call(&self, call: &str);

    fn check_error(&self, call: &str);
}

//////////////////////////////////////////////////
// Definition

/// OpenGL ES 2.0 surface on top of a glutin context.
pub struct GlSurfaceView {
    app: App,
    debug: GlDebugFlags,
    size: Option<(u32, u32)>,
}

/// A surface view together with the event loop it has to create windows on.
pub struct BoundSurface<'a> {
    view: &'a mut GlSurfaceView,
    event_loop: &'a ActiveEventLoop,
}

/// Applies the surface debug flags around every renderer callback.
struct DebugRenderer<'a> {
    inner: &'a mut dyn Renderer,
    output: &'a dyn GlDebugOutput,
    debug: GlDebugFlags,
}

//////////////////////////////////////////////////
// Implementation

impl GlSurfaceView {
    pub fn new(setup: SurfaceSetup, config: &HostConfig) -> Self {
        if setup.emulator {
            log::info!("Emulator detected, using explicit EGL config");
        }
        GlSurfaceView {
            app: App::new(setup, config),
            debug: config.gl_debug,
            size: None,
        }
    }

    pub fn bind<'a>(&'a mut self, event_loop: &'a ActiveEventLoop) -> BoundSurface<'a> {
        BoundSurface { view: self, event_loop }
    }

    pub fn exit(&mut self) {
        self.app.exit();
    }

    fn with_debug<T>(&self, renderer: &mut dyn Renderer, f: impl FnOnce(&mut dyn Renderer) -> T) -> T {
        match self.app.renderer() {
            Some(gl) => f(&mut DebugRenderer { inner: renderer, output: gl, debug: self.debug }),
            None => f(renderer),
        }
    }
}

impl SurfaceView for BoundSurface<'_> {
    fn on_pause(&mut self) {
        log::debug!("Surface paused");
        self.view.size = None;
        self.view.app.suspend();
    }

    fn on_resume(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        log::debug!("Surface resumed");
        let size = self.view.app.resume(self.event_loop)?;
        self.view.with_debug(renderer, |renderer| renderer.surface_created());
        self.resize(size.width, size.height, renderer);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32, renderer: &mut dyn Renderer) {
        if width == 0 || height == 0 || self.view.size == Some((width, height)) || !self.view.app.has_surface_and_context() {
            return;
        }
        self.view.size = Some((width, height));
        self.view.app.resize(width, height);
        self.view.with_debug(renderer, |renderer| renderer.surface_changed(width, height));
    }

    fn render(&mut self, renderer: &mut dyn Renderer) {
        if !self.view.app.has_surface_and_context() {
            return;
        }
        self.view.with_debug(renderer, |renderer| renderer.draw_frame());
        if let Err(err) = self.view.app.swap_buffers() {
            log::error!("Failed to swap buffers: {}", err);
        }
    }

    fn origin(&self) -> Location {
        // the window surface covers the whole native window
        Location::default()
    }
}

impl GlDebugOutput for Gl {
    fn log_call(&self, call: &str) {
        log::trace!("{}", call);
    }

    fn check_error(&self, call: &str) {
        check_error(self, call);
    }
}

impl DebugRenderer<'_> {
    fn after(&self, call: &str) {
        if self.debug.contains(GlDebugFlags::LOG_GL_CALLS) {
            self.output.log_call(call);
        }
        if self.debug.contains(GlDebugFlags::CHECK_GL_ERROR) {
            self.output.check_error(call);
        }
    }
}

impl Renderer for DebugRenderer<'_> {
    fn surface_created(&mut self) {
        self.inner.surface_created();
        self.after("onSurfaceCreated()");
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.inner.surface_changed(width, height);
        self.after(&format!("onSurfaceChanged({}, {})", width, height));
    }

    fn draw_frame(&mut self) {
        self.inner.draw_frame();
        self.after("onDrawFrame()");
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, entry: String) {
            self.calls.borrow_mut().push(entry);
        }

        fn take(&self) -> Vec<String> {
            self.calls.take()
        }
    }

    impl Renderer for &Recorder {
        fn surface_created(&mut self) {
            self.push(String::from("created"));
        }

        fn surface_changed(&mut self, width: u32, height: u32) {
            self.push(format!("changed {}x{}", width, height));
        }

        fn draw_frame(&mut self) {
            self.push(String::from("draw"));
        }
    }

    impl GlDebugOutput for Recorder {
        fn log_call(&self, call: &str) {
            self.push(format!("log {}", call));
        }

        fn check_error(&self, call: &str) {
            self.push(format!("check {}", call));
        }
    }

    fn run_callbacks(recorder: &Recorder, debug: GlDebugFlags) {
        let mut inner = recorder;
        let mut renderer = DebugRenderer { inner: &mut inner, output: recorder, debug };
        renderer.surface_created();
        renderer.surface_changed(640, 480);
        renderer.draw_frame();
    }

    #[test]
    fn both_flags_run_after_every_callback() {
        let recorder = Recorder::default();
        run_callbacks(&recorder, GlDebugFlags::CHECK_GL_ERROR | GlDebugFlags::LOG_GL_CALLS);
        assert_eq!(
            recorder.take(),
            [
                "created",
                "log onSurfaceCreated()",
                "check onSurfaceCreated()",
                "changed 640x480",
                "log onSurfaceChanged(640, 480)",
                "check onSurfaceChanged(640, 480)",
                "draw",
                "log onDrawFrame()",
                "check onDrawFrame()",
            ]
        );
    }

    #[test]
    fn flags_are_applied_separately() {
        let recorder = Recorder::default();
        run_callbacks(&recorder, GlDebugFlags::CHECK_GL_ERROR);
        assert_eq!(recorder.take(), ["created", "check onSurfaceCreated()", "changed 640x480", "check onSurfaceChanged(640, 480)", "draw", "check onDrawFrame()"]);

        run_callbacks(&recorder, GlDebugFlags::LOG_GL_CALLS);
        assert_eq!(recorder.take(), ["created", "log onSurfaceCreated()", "changed 640x480", "log onSurfaceChanged(640, 480)", "draw", "log onDrawFrame()"]);

        run_callbacks(&recorder, GlDebugFlags::empty());
        assert_eq!(recorder.take(), ["created", "changed 640x480", "draw"]);
    }
}
