//////////////////////////////////////////////////
// Using

use std::ffi::CString;
use std::num::NonZeroU32;

use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;

use glutin::config::{ColorBufferType, Config, ConfigTemplateBuilder, GetGlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, NotCurrentContext, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use winit::window::{Window, WindowAttributes};

use crate::capability::{ConfigSizes, SurfaceSetup};
use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::gl;
use crate::opengl::GlString;
use crate::Gl;

//////////////////////////////////////////////////
// Definition

struct AppState {
    window: Window,
    surface: Surface<WindowSurface>,
}

/// EGL display, context and window surface of the activity.
pub struct App {
    template: ConfigTemplateBuilder,
    window_attributes: WindowAttributes,
    client_version: Version,
    emulator: bool,
    vsync: bool,
    display: GlDisplayCreationState,
    context: Option<PossiblyCurrentContext>,
    state: Option<AppState>,
    renderer: Option<Gl>,
}

enum GlDisplayCreationState {
    /// The display was not build yet.
    Builder(DisplayBuilder),
    /// The display was already created for the application.
    Init,
}

//////////////////////////////////////////////////
// Implementations

impl App {
    pub fn new(setup: SurfaceSetup, config: &HostConfig) -> Self {
        let window_attributes = Window::default_attributes().with_title(config.title.clone());
        let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes.clone()));
        Self {
            template: setup.config_template(),
            window_attributes,
            client_version: Version::new(setup.client_version.major as u8, setup.client_version.minor as u8),
            emulator: setup.emulator,
            vsync: config.vsync,
            display: GlDisplayCreationState::Builder(display_builder),
            context: None,
            state: None,
            renderer: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(Window, Config)> {
        match &self.display {
            // First resume: initialize the display, pick the config and create the context.
            GlDisplayCreationState::Builder(display_builder) => {
                let picker: fn(Box<dyn Iterator<Item = Config> + '_>) -> Config = if self.emulator { emulator_config_picker } else { gl_config_picker };
                let (window, gl_config) = display_builder
                    .clone()
                    .build(event_loop, self.template.clone(), picker)
                    .map_err(|err| HostError::Display(err.to_string()))?;
                let window = window.ok_or_else(|| HostError::Display(String::from("no window created")))?;

                log::debug!("Picked a config with {} samples", gl_config.num_samples());

                // The display stays valid until it is destroyed explicitly.
                self.display = GlDisplayCreationState::Init;
                self.context = Some(create_gl_context(&window, &gl_config, self.client_version)?.treat_as_possibly_current());

                Ok((window, gl_config))
            }
            GlDisplayCreationState::Init => {
                log::debug!("Recreating window");
                let gl_config = self.context.as_ref().ok_or(HostError::SurfaceNotReady)?.config();
                let window = glutin_winit::finalize_window(event_loop, self.window_attributes.clone(), &gl_config)?;
                Ok((window, gl_config))
            }
        }
    }

    fn create_renderer<D: GlDisplay>(&mut self, gl_display: &D) {
        self.renderer.get_or_insert_with(|| {
            let gl = Gl::new(gl::Gles2::load_with(|ptr| match CString::new(ptr) {
                Ok(ptr) => gl_display.get_proc_address(ptr.as_c_str()).cast(),
                Err(_) => std::ptr::null(),
            }));

            if let Some(renderer) = GlString::get(&gl, gl::RENDERER) {
                log::info!("Running on {}", renderer);
            }
            if let Some(version) = GlString::get(&gl, gl::VERSION) {
                log::info!("OpenGL Version {}", version);
            }
            if let Some(shaders_version) = GlString::get(&gl, gl::SHADING_LANGUAGE_VERSION) {
                log::info!("Shaders version on {}", shaders_version);
            }
            gl
        });
    }

    /// Creates the window surface and makes the context current on it.
    pub fn resume(&mut self, event_loop: &ActiveEventLoop) -> Result<PhysicalSize<u32>> {
        let (window, gl_config) = self.create_window(event_loop)?;
        let attrs = window.build_surface_attributes(Default::default())?;
        let gl_surface = unsafe { gl_config.display().create_window_surface(&gl_config, &attrs)? };

        let gl_context = self.context.as_ref().ok_or(HostError::SurfaceNotReady)?;
        gl_context.make_current(&gl_surface)?;

        let interval = if self.vsync { SwapInterval::Wait(NonZeroU32::MIN) } else { SwapInterval::DontWait };
        if let Err(res) = gl_surface.set_swap_interval(gl_context, interval) {
            log::error!("Error setting vsync: {res:?}");
        }

        self.create_renderer(&gl_config.display());

        let size = window.inner_size();
        window.request_redraw();
        self.state = Some(AppState { surface: gl_surface, window });
        Ok(size)
    }

    /// Drops the window surface; the context survives for the next resume.
    pub fn suspend(&mut self) {
        // Destroy the surface and un-current the context before the native
        // window is handed back to the system.
        self.state = None;

        if let Some(context) = self.context.take() {
            match context.make_not_current() {
                Ok(context) => self.context = Some(context.treat_as_possibly_current()),
                Err(err) => log::error!("Failed to release context: {}", err),
            }
        }
    }

    pub fn swap_buffers(&mut self) -> Result<()> {
        if let (Some(AppState { surface, window }), Some(gl_context)) = (self.state.as_ref(), self.context.as_ref()) {
            window.request_redraw();
            surface.swap_buffers(gl_context)?;
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // EGL on some platforms needs the surface resized explicitly, elsewhere this is a no-op.
        if let (Some(AppState { surface, .. }), Some(gl_context)) = (self.state.as_ref(), self.context.as_ref()) {
            if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
                surface.resize(gl_context, width, height);
            }
        }
    }

    pub fn exit(&mut self) {
        self.state = None;
        self.renderer = None;
        let Some(context) = self.context.take() else {
            return;
        };
        let _gl_display = context.display();
        drop(context);

        #[cfg(egl_backend)]
        #[allow(irrefutable_let_patterns)]
        if let glutin::display::Display::Egl(display) = _gl_display {
            unsafe {
                display.terminate();
            }
        }
    }

    pub fn has_surface_and_context(&self) -> bool {
        self.context.is_some() && self.state.is_some()
    }

    pub fn renderer(&self) -> Option<&Gl> {
        self.renderer.as_ref()
    }
}

pub fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            let transparency_check = config.supports_transparency().unwrap_or(false) & !accum.supports_transparency().unwrap_or(false);
            if transparency_check || config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offers at least one config")
}

/// Takes the first exact RGBA8888 config; some emulator images crash on the
/// multisampled ones the default picker prefers.
pub fn emulator_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    let configs: Vec<Config> = configs.collect();
    match configs.iter().find(|config| SurfaceSetup::emulator_accepts(&config_sizes(config))) {
        Some(config) => config.clone(),
        None => {
            log::warn!("No RGBA8888 config offered, using the first one");
            configs.into_iter().next().expect("display offers at least one config")
        }
    }
}

fn config_sizes(config: &Config) -> ConfigSizes {
    let (red, green, blue) = match config.color_buffer_type() {
        Some(ColorBufferType::Rgb { r_size, g_size, b_size }) => (r_size, g_size, b_size),
        _ => (0, 0, 0),
    };
    ConfigSizes {
        red,
        green,
        blue,
        alpha: config.alpha_size(),
        depth: config.depth_size(),
        stencil: config.stencil_size(),
    }
}

fn create_gl_context(window: &Window, gl_config: &Config, client_version: Version) -> Result<NotCurrentContext> {
    let raw_window_handle = window.window_handle().ok().map(|wh| wh.as_raw());

    // The surface must run OpenGL ES at the requested client version.
    let gles_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(Some(client_version)))
        .build(raw_window_handle);

    // Desktop drivers without ES support get a 2.1 context, which covers the ES 2.0 feature set.
    let legacy_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(2, 1))))
        .build(raw_window_handle);

    let gl_display = gl_config.display();

    unsafe {
        match gl_display.create_context(gl_config, &gles_attributes) {
            Ok(context) => Ok(context),
            Err(err) => {
                log::warn!("OpenGL ES {}.{} context not available: {}", client_version.major, client_version.minor, err);
                Ok(gl_display.create_context(gl_config, &legacy_attributes)?)
            }
        }
    }
}
