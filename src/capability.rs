//////////////////////////////////////////////////
// Using

use std::fmt;

use glutin::config::ConfigTemplateBuilder;

use crate::error::{HostError, Result};

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

//////////////////////////////////////////////////
// Constants

/// Packed `reqGlEsVersion` of OpenGL ES 2.0 (major in the upper 16 bits).
pub const GLES2_VERSION: u32 = 0x0002_0000;

/// `Build.VERSION_CODES.ICE_CREAM_SANDWICH_MR1`
pub const ICE_CREAM_SANDWICH_MR1: i32 = 15;

const EMULATOR_FINGERPRINTS: [&str; 2] = ["generic", "unknown"];
const EMULATOR_MODELS: [&str; 3] = ["google_sdk", "Emulator", "Android SDK built for x86"];

const EMULATOR_COLOR_SIZE: u8 = 8;
const EMULATOR_DEPTH_SIZE: u8 = 16;
const EMULATOR_STENCIL_SIZE: u8 = 0;

//////////////////////////////////////////////////
// Definition

/// Device values read by the capability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub req_gl_es_version: u32,
    pub sdk_int: i32,
    pub fingerprint: String,
    pub model: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlEsVersion {
    pub major: u16,
    pub minor: u16,
}

/// How the rendering surface has to be configured after a successful probe.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSetup {
    pub client_version: GlEsVersion,
    pub emulator: bool,
}

/// Buffer sizes of a framebuffer config.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ConfigSizes {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
    pub depth: u8,
    pub stencil: u8,
}

//////////////////////////////////////////////////
// Probe

impl DeviceInfo {
    pub fn gl_es_version(&self) -> GlEsVersion {
        GlEsVersion::from_packed(self.req_gl_es_version)
    }

    pub fn is_probably_emulator(&self) -> bool {
        self.sdk_int >= ICE_CREAM_SANDWICH_MR1
            && (EMULATOR_FINGERPRINTS.iter().any(|prefix| self.fingerprint.starts_with(prefix))
                || EMULATOR_MODELS.iter().any(|model| self.model.contains(model)))
    }

    pub fn supports_es2(&self) -> bool {
        self.req_gl_es_version >= GLES2_VERSION || self.is_probably_emulator()
    }

    /// Checks ES2 support and derives the surface setup. Not retried on failure.
    pub fn probe(&self) -> Result<SurfaceSetup> {
        if !self.supports_es2() {
            return Err(HostError::Es2Unsupported);
        }
        Ok(SurfaceSetup {
            client_version: GlEsVersion { major: 2, minor: 0 },
            emulator: self.is_probably_emulator(),
        })
    }
}

#[cfg(target_os = "android")]
impl DeviceInfo {
    pub fn query(android_app: &AndroidApp) -> Result<Self> {
        use jni::objects::{JObject, JString, JValue};

        crate::android::with_activity(android_app, |env, activity| {
            let build = env.find_class("android/os/Build")?;
            let fingerprint: JString = env.get_static_field(&build, "FINGERPRINT", "Ljava/lang/String;")?.l()?.into();
            let fingerprint: String = env.get_string(&fingerprint)?.into();
            let model: JString = env.get_static_field(&build, "MODEL", "Ljava/lang/String;")?.l()?.into();
            let model: String = env.get_string(&model)?.into();

            let sdk_int = env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?.i()?;

            let service = env.new_string("activity")?;
            let activity_manager = env
                .call_method(activity, "getSystemService", "(Ljava/lang/String;)Ljava/lang/Object;", &[JValue::Object(&JObject::from(service))])?
                .l()?;
            let configuration_info = env
                .call_method(&activity_manager, "getDeviceConfigurationInfo", "()Landroid/content/pm/ConfigurationInfo;", &[])?
                .l()?;
            let req_gl_es_version = env.get_field(&configuration_info, "reqGlEsVersion", "I")?.i()?;

            Ok(DeviceInfo {
                req_gl_es_version: req_gl_es_version as u32,
                sdk_int,
                fingerprint,
                model,
            })
        })
    }
}

#[cfg(not(target_os = "android"))]
impl DeviceInfo {
    /// Desktop hosts are assumed to provide at least ES 2.0.
    pub fn query() -> Result<Self> {
        Ok(DeviceInfo {
            req_gl_es_version: GLES2_VERSION,
            sdk_int: 0,
            fingerprint: String::from("desktop"),
            model: String::from(std::env::consts::OS),
        })
    }
}

//////////////////////////////////////////////////
// Surface setup

impl SurfaceSetup {
    pub fn config_template(&self) -> ConfigTemplateBuilder {
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        #[cfg(target_os = "android")]
        let template = template.with_api(glutin::config::Api::GLES2);
        if self.emulator {
            // RGBA8888, depth 16, no stencil. Some emulator images crash on start-up otherwise.
            template
                .with_buffer_type(glutin::config::ColorBufferType::Rgb {
                    r_size: EMULATOR_COLOR_SIZE,
                    g_size: EMULATOR_COLOR_SIZE,
                    b_size: EMULATOR_COLOR_SIZE,
                })
                .with_depth_size(EMULATOR_DEPTH_SIZE)
                .with_stencil_size(EMULATOR_STENCIL_SIZE)
        } else {
            template
        }
    }

    /// Whether a config can back the emulator surface: exactly RGBA8888 with at
    /// least the requested depth and stencil sizes.
    pub fn emulator_accepts(sizes: &ConfigSizes) -> bool {
        [sizes.red, sizes.green, sizes.blue, sizes.alpha].iter().all(|size| *size == EMULATOR_COLOR_SIZE)
            && sizes.depth >= EMULATOR_DEPTH_SIZE
            && sizes.stencil >= EMULATOR_STENCIL_SIZE
    }
}

//////////////////////////////////////////////////
// Version

impl GlEsVersion {
    pub fn from_packed(packed: u32) -> Self {
        GlEsVersion {
            major: (packed >> 16) as u16,
            minor: (packed & 0xffff) as u16,
        }
    }
}

impl fmt::Display for GlEsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn device(req_gl_es_version: u32, sdk_int: i32, fingerprint: &str, model: &str) -> DeviceInfo {
        DeviceInfo {
            req_gl_es_version,
            sdk_int,
            fingerprint: fingerprint.to_owned(),
            model: model.to_owned(),
        }
    }

    #[test]
    fn es2_devices_are_supported() {
        let info = device(0x0003_0002, 30, "google/redfin/redfin:13", "Pixel 5");
        assert!(info.supports_es2());
        assert_eq!(info.probe().unwrap(), SurfaceSetup { client_version: GlEsVersion { major: 2, minor: 0 }, emulator: false });
    }

    #[test]
    fn es1_devices_are_rejected() {
        let info = device(0x0001_0001, 30, "acme/phone:10", "Phone");
        assert!(!info.supports_es2());
        assert!(matches!(info.probe(), Err(HostError::Es2Unsupported)));
    }

    #[test]
    fn emulator_signatures() {
        assert!(device(0, 15, "generic/sdk/generic:4.0.4", "sdk").is_probably_emulator());
        assert!(device(0, 20, "unknown/x86:5", "sdk").is_probably_emulator());
        assert!(device(0, 20, "acme", "google_sdk").is_probably_emulator());
        assert!(device(0, 20, "acme", "Galaxy Emulator").is_probably_emulator());
        assert!(device(0, 20, "acme", "Android SDK built for x86_64").is_probably_emulator());
        assert!(!device(0, 20, "acme/generic", "Phone").is_probably_emulator());
    }

    #[test]
    fn emulator_detection_requires_sdk_15() {
        let old = device(0, 14, "generic/sdk", "sdk");
        assert!(!old.is_probably_emulator());
        assert!(!old.supports_es2());
    }

    #[test]
    fn emulator_passes_probe_with_emulator_config() {
        let info = device(0x0001_0000, 28, "generic_x86/sdk_gphone", "Android SDK built for x86");
        let setup = info.probe().unwrap();
        assert!(setup.emulator);
    }

    #[test]
    fn emulator_template_asks_for_rgba8888_depth16() {
        let setup = SurfaceSetup { client_version: GlEsVersion { major: 2, minor: 0 }, emulator: true };
        let template = format!("{:?}", setup.config_template().build());
        assert!(template.contains("r_size: 8, g_size: 8, b_size: 8"), "{}", template);
        assert!(template.contains("alpha_size: 8"), "{}", template);
        assert!(template.contains("depth_size: 16"), "{}", template);

        let device = format!("{:?}", SurfaceSetup { emulator: false, ..setup }.config_template().build());
        assert!(device.contains("depth_size: 0"), "{}", device);
    }

    #[test]
    fn emulator_config_rule() {
        let rgba8888 = ConfigSizes { red: 8, green: 8, blue: 8, alpha: 8, depth: 16, stencil: 0 };
        assert!(SurfaceSetup::emulator_accepts(&rgba8888));
        assert!(SurfaceSetup::emulator_accepts(&ConfigSizes { depth: 24, stencil: 8, ..rgba8888 }));

        assert!(!SurfaceSetup::emulator_accepts(&ConfigSizes { depth: 0, ..rgba8888 }));
        assert!(!SurfaceSetup::emulator_accepts(&ConfigSizes { alpha: 0, ..rgba8888 }));
        assert!(!SurfaceSetup::emulator_accepts(&ConfigSizes { red: 10, green: 10, blue: 10, alpha: 2, ..rgba8888 }));
        assert!(!SurfaceSetup::emulator_accepts(&ConfigSizes { red: 5, green: 6, blue: 5, alpha: 0, ..rgba8888 }));
    }

    #[test]
    fn packed_versions() {
        let version = GlEsVersion::from_packed(0x0003_0001);
        assert_eq!(version, GlEsVersion { major: 3, minor: 1 });
        assert_eq!(version.to_string(), "3.1");
        assert_eq!(device(GLES2_VERSION, 0, "", "").gl_es_version().to_string(), "2.0");
    }
}
