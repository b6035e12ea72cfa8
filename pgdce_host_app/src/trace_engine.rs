//////////////////////////////////////////////////
// Using

use pgdce_host::input::{keycode, motion_action};
use pgdce_host::prelude::*;

//////////////////////////////////////////////////
// Engine

/// Stand-in engine that logs every entry point.
#[derive(Debug, Default)]
pub struct TraceEngine {
    frames: u64,
    resolution: (i32, i32),
}

impl TraceEngine {
    pub fn new() -> TraceEngine {
        Default::default()
    }
}

impl Engine for TraceEngine {
    fn init(&mut self, assets: &AssetManagerHandle) {
        log::debug!("init (assets attached: {})", assets.is_attached());
    }

    fn on_surface_created(&mut self) {
        log::debug!("onSurfaceCreated");
        self.frames = 0;
    }

    fn on_surface_changed(&mut self, width: i32, height: i32) {
        log::debug!("onSurfaceChanged ({} x {})", width, height);
        self.resolution = (width, height);
    }

    fn draw_frame(&mut self) {
        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!("drawFrame #{} at {:?}", self.frames, self.resolution);
        }
    }

    fn set_config(&mut self, config: &str) {
        log::debug!("setConfig {:?}", config);
    }

    fn on_pause(&mut self) {
        log::debug!("onPause");
    }

    fn on_resume(&mut self) {
        log::debug!("onResume");
    }

    fn on_key_event(&mut self, action: i32, key_code: i32, scan_code: i32) -> bool {
        log::debug!("onKeyEvent ({}, {}, {})", action, key_code, scan_code);
        // leave BACK to the platform
        key_code != keycode::BACK
    }

    fn on_touch_event(&mut self, action: i32, pointer_id: i32, x: f32, y: f32) -> bool {
        if action != motion_action::MOVE {
            log::debug!("onTouchEvent ({}, {}, {}, {})", action, pointer_id, x, y);
        }
        true
    }
}
