//////////////////////////////////////////////////
// Using

use crate::capability::{DeviceInfo, SurfaceSetup};
use crate::engine::{AssetManagerHandle, Engine};
use crate::error::Result;
use crate::input::{key_action, keycode, motion_action, KeyEvent, Location, MotionEvent};
use crate::notice::Notice;
use crate::renderer::RendererWrapper;
use crate::surface::SurfaceView;

//////////////////////////////////////////////////
// Definition

/// Activity side of the host: lifecycle, capability check and input
/// forwarding to the engine.
pub struct MainActivity<E: Engine> {
    engine: E,
    notice: Box<dyn Notice>,
    renderer_set: bool,
}

//////////////////////////////////////////////////
// Implementation

impl<E: Engine> MainActivity<E> {
    pub fn new(engine: E, notice: Box<dyn Notice>) -> Self {
        MainActivity {
            engine,
            notice,
            renderer_set: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Whether a rendering surface was set up by [`MainActivity::create`].
    pub fn renderer_set(&self) -> bool {
        self.renderer_set
    }

    /// Probes ES2 support and initializes the engine.
    ///
    /// Without ES2 support the user is notified, the engine is not initialized
    /// and the screen stays without a surface.
    pub fn create(&mut self, device: &DeviceInfo, assets: &AssetManagerHandle, engine_config: Option<&str>) -> Result<SurfaceSetup> {
        log::info!(
            "Creating activity on {} (sdk {}, GL ES {})",
            device.model,
            device.sdk_int,
            device.gl_es_version()
        );

        let setup = match device.probe() {
            Ok(setup) => setup,
            Err(err) => {
                // manifests filter unsupported devices, this should not be seen in production
                self.notice.show(&err.to_string());
                return Err(err);
            }
        };
        self.renderer_set = true;

        self.engine.init(assets);
        if let Some(engine_config) = engine_config {
            self.engine.set_config(engine_config);
        }
        Ok(setup)
    }

    pub fn pause(&mut self, surface: Option<&mut dyn SurfaceView>) {
        log::info!("Pausing activity");
        self.engine.on_pause();
        if let Some(surface) = surface.filter(|_| self.renderer_set) {
            surface.on_pause();
        }
    }

    pub fn resume(&mut self, surface: Option<&mut dyn SurfaceView>) -> Result<()> {
        log::info!("Resuming activity");
        if let Some(surface) = surface.filter(|_| self.renderer_set) {
            surface.on_resume(&mut RendererWrapper::new(&mut self.engine))?;
        }
        self.engine.on_resume();
        Ok(())
    }

    pub fn draw_frame(&mut self, surface: &mut dyn SurfaceView) {
        if self.renderer_set {
            surface.render(&mut RendererWrapper::new(&mut self.engine));
        }
    }

    pub fn resize(&mut self, surface: &mut dyn SurfaceView, width: u32, height: u32) {
        if self.renderer_set {
            surface.resize(width, height, &mut RendererWrapper::new(&mut self.engine));
        }
    }

    /// Handles a key change from the window. Only presses reach the engine,
    /// releases are left to the platform. Returns true when the activity should finish.
    pub fn key(&mut self, event: &KeyEvent) -> bool {
        if event.action != key_action::DOWN {
            return false;
        }
        !self.key_down(event) && self.back_pressed(event)
    }

    /// Forwards a key press. Returns whether the engine consumed it.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        log::debug!(
            "KeyPress: ({}, {}) of {}, long: {}, '{}'",
            event.key_code,
            event.scan_code,
            event.device_id,
            event.long_press,
            event.unicode_char.unwrap_or(' ')
        );
        self.engine.on_key_event(event.action, event.key_code, event.scan_code)
    }

    /// Handles a BACK key the engine did not consume. Returns true when the activity should finish.
    pub fn back_pressed(&mut self, event: &KeyEvent) -> bool {
        if event.key_code != keycode::BACK {
            return false;
        }
        log::info!("back pressed");
        true
    }

    /// Forwards a motion event in surface coordinates. Returns whether it was consumed.
    pub fn touch(&mut self, event: &MotionEvent, origin: Location) -> bool {
        if !self.renderer_set {
            return false;
        }
        let Some(pointer) = event.action_pointer() else {
            return false;
        };
        let (id, x, y) = (pointer.id, pointer.location.x - origin.x, pointer.location.y - origin.y);

        match event.action_masked {
            motion_action::DOWN => {
                self.engine.on_touch_event(motion_action::DOWN, id, x, y);
                self.engine.on_touch_event(motion_action::POINTER_DOWN, id, x, y)
            }
            motion_action::UP => {
                self.engine.on_touch_event(motion_action::POINTER_UP, id, x, y);
                self.engine.on_touch_event(motion_action::CANCEL, id, x, y);
                true
            }
            motion_action::CANCEL => {
                self.engine.on_touch_event(motion_action::CANCEL, id, x, y);
                true
            }
            motion_action::MOVE => {
                for pointer in &event.pointers {
                    self.engine.on_touch_event(motion_action::MOVE, pointer.id, pointer.location.x - origin.x, pointer.location.y - origin.y);
                }
                true
            }
            motion_action::POINTER_DOWN | motion_action::POINTER_UP => self.engine.on_touch_event(event.action_masked, id, x, y),
            _ => false,
        }
    }

    pub fn low_memory(&mut self) {
        log::warn!("Low memory");
    }
}

impl<E: Engine + std::fmt::Debug> std::fmt::Debug for MainActivity<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainActivity")
            .field("engine", &self.engine)
            .field("renderer_set", &self.renderer_set)
            .finish()
    }
}

