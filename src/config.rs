//////////////////////////////////////////////////
// Using

use bitflags::bitflags;

use crate::file::Files;

//////////////////////////////////////////////////
// Definitions

bitflags! {
    /// Debug behaviour of the GL surface, bit compatible with `GLSurfaceView.DEBUG_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GlDebugFlags: u32 {
        /// Drain and log `glGetError` after every renderer callback.
        const CHECK_GL_ERROR = 1 << 0;
        /// Trace every renderer callback.
        const LOG_GL_CALLS = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub title: String,
    pub gl_debug: GlDebugFlags,
    pub vsync: bool,
    /// Passed to the engine after `init`. Takes precedence over `config_asset`.
    pub engine_config: Option<String>,
    /// Asset read for the engine config when `engine_config` is not set.
    pub config_asset: Option<String>,
}

//////////////////////////////////////////////////
// Host config

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            title: String::from("PGDCE"),
            gl_debug: GlDebugFlags::CHECK_GL_ERROR | GlDebugFlags::LOG_GL_CALLS,
            vsync: true,
            engine_config: None,
            config_asset: Some(String::from("pgdce.cfg")),
        }
    }
}

impl HostConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_gl_debug(mut self, gl_debug: GlDebugFlags) -> Self {
        self.gl_debug = gl_debug;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_engine_config(mut self, engine_config: &str) -> Self {
        self.engine_config = Some(engine_config.to_owned());
        self
    }

    pub fn with_config_asset(mut self, config_asset: Option<&str>) -> Self {
        self.config_asset = config_asset.map(str::to_owned);
        self
    }

    /// Resolves the string handed to `Engine::set_config`, if any.
    pub fn engine_config(&self, files: &Files) -> Option<String> {
        self.engine_config.clone().or_else(|| {
            let asset = self.config_asset.as_deref()?;
            let config = files.load_string(asset);
            match &config {
                Some(_) => log::debug!("Loaded engine config from {}", asset),
                None => log::debug!("No engine config asset {}", asset),
            }
            config
        })
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flags() {
        // same values as GLSurfaceView.DEBUG_CHECK_GL_ERROR and DEBUG_LOG_GL_CALLS
        assert_eq!(GlDebugFlags::CHECK_GL_ERROR.bits(), 1);
        assert_eq!(GlDebugFlags::LOG_GL_CALLS.bits(), 2);
        assert_eq!(GlDebugFlags::from_bits_truncate(0xff), GlDebugFlags::all());
        assert!(!GlDebugFlags::empty().contains(GlDebugFlags::CHECK_GL_ERROR));
    }

    #[test]
    fn defaults_enable_gl_debugging() {
        let config = HostConfig::default();
        assert_eq!(config.gl_debug, GlDebugFlags::CHECK_GL_ERROR | GlDebugFlags::LOG_GL_CALLS);
        assert!(config.vsync);
        assert_eq!(config.config_asset.as_deref(), Some("pgdce.cfg"));
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn explicit_engine_config_wins() {
        let files = Files::new();
        let config = HostConfig::default().with_engine_config("width=800");
        assert_eq!(config.engine_config(&files).as_deref(), Some("width=800"));

        let config = HostConfig::default().with_config_asset(Some("does-not-exist.cfg"));
        assert_eq!(config.engine_config(&files), None);

        let config = HostConfig::default().with_config_asset(None);
        assert_eq!(config.engine_config(&files), None);
    }
}
