//////////////////////////////////////////////////
// Using

use crate::engine::Engine;

//////////////////////////////////////////////////
// Traits

/// Callbacks a rendering surface makes on its render thread.
pub trait Renderer {
    fn surface_created(&mut self);

    fn surface_changed(&mut self, width: u32, height: u32);

    fn draw_frame(&mut self);
}

//////////////////////////////////////////////////
// Definition

/// Forwards surface callbacks to the engine, one call each.
#[derive(Debug)]
pub struct RendererWrapper<'a, E: Engine> {
    engine: &'a mut E,
}

//////////////////////////////////////////////////
// Implementation

impl<'a, E: Engine> RendererWrapper<'a, E> {
    pub fn new(engine: &'a mut E) -> Self {
        RendererWrapper { engine }
    }
}

impl<E: Engine> Renderer for RendererWrapper<'_, E> {
    fn surface_created(&mut self) {
        self.engine.on_surface_created();
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.engine.on_surface_changed(to_jint(width), to_jint(height));
    }

    fn draw_frame(&mut self) {
        self.engine.draw_frame();
    }
}

fn to_jint(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AssetManagerHandle;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl Engine for Calls {
        fn init(&mut self, _assets: &AssetManagerHandle) {
            self.0.push("init".into());
        }
        fn on_surface_created(&mut self) {
            self.0.push("surface_created".into());
        }
        fn on_surface_changed(&mut self, width: i32, height: i32) {
            self.0.push(format!("surface_changed {}x{}", width, height));
        }
        fn draw_frame(&mut self) {
            self.0.push("draw_frame".into());
        }
        fn set_config(&mut self, _config: &str) {}
        fn on_pause(&mut self) {}
        fn on_resume(&mut self) {}
        fn on_key_event(&mut self, _action: i32, _key_code: i32, _scan_code: i32) -> bool {
            false
        }
        fn on_touch_event(&mut self, _action: i32, _pointer_id: i32, _x: f32, _y: f32) -> bool {
            false
        }
    }

    #[test]
    fn callbacks_map_one_to_one() {
        let mut engine = Calls::default();
        {
            let mut renderer = RendererWrapper::new(&mut engine);
            renderer.surface_created();
            renderer.surface_changed(1080, 2340);
            renderer.draw_frame();
            renderer.draw_frame();
        }
        assert_eq!(engine.0, ["surface_created", "surface_changed 1080x2340", "draw_frame", "draw_frame"]);
    }

    #[test]
    fn oversized_dimensions_saturate() {
        assert_eq!(to_jint(u32::MAX), i32::MAX);
        assert_eq!(to_jint(640), 640);
    }
}
