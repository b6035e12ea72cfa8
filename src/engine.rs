//////////////////////////////////////////////////
// Using

#[cfg(target_os = "android")]
use jni::objects::GlobalRef;

//////////////////////////////////////////////////
// Definition

/// Handle to the platform asset manager handed to [`Engine::init`].
///
/// On Android this is a JNI global reference to the activity's `AssetManager`.
/// The native side may keep using it, so whoever receives it must keep the
/// handle alive for as long as the engine runs.
#[derive(Debug, Clone, Default)]
pub struct AssetManagerHandle {
    #[cfg(target_os = "android")]
    java: Option<GlobalRef>,
}

/// Native entry points of the engine.
///
/// Every callback from the platform ends up in exactly one of these calls. The
/// host never inspects engine state; the only values flowing back are the
/// "consumed" flags of the input calls.
pub trait Engine {
    fn init(&mut self, assets: &AssetManagerHandle);

    fn on_surface_created(&mut self);

    fn on_surface_changed(&mut self, width: i32, height: i32);

    fn draw_frame(&mut self);

    fn set_config(&mut self, config: &str);

    fn on_pause(&mut self);

    fn on_resume(&mut self);

    fn on_key_event(&mut self, action: i32, key_code: i32, scan_code: i32) -> bool;

    fn on_touch_event(&mut self, action: i32, pointer_id: i32, x: f32, y: f32) -> bool;
}

//////////////////////////////////////////////////
// Implementation

impl AssetManagerHandle {
    /// A handle that refers to no asset manager.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        #[cfg(target_os = "android")]
        return self.java.is_some();
        #[cfg(not(target_os = "android"))]
        return false;
    }
}

#[cfg(target_os = "android")]
impl AssetManagerHandle {
    pub fn from_global(java: GlobalRef) -> Self {
        AssetManagerHandle { java: Some(java) }
    }

    pub fn as_raw(&self) -> jni::sys::jobject {
        self.java.as_ref().map(|java| java.as_obj().as_raw()).unwrap_or(std::ptr::null_mut())
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn init(&mut self, assets: &AssetManagerHandle) {
        (**self).init(assets)
    }

    fn on_surface_created(&mut self) {
        (**self).on_surface_created()
    }

    fn on_surface_changed(&mut self, width: i32, height: i32) {
        (**self).on_surface_changed(width, height)
    }

    fn draw_frame(&mut self) {
        (**self).draw_frame()
    }

    fn set_config(&mut self, config: &str) {
        (**self).set_config(config)
    }

    fn on_pause(&mut self) {
        (**self).on_pause()
    }

    fn on_resume(&mut self) {
        (**self).on_resume()
    }

    fn on_key_event(&mut self, action: i32, key_code: i32, scan_code: i32) -> bool {
        (**self).on_key_event(action, key_code, scan_code)
    }

    fn on_touch_event(&mut self, action: i32, pointer_id: i32, x: f32, y: f32) -> bool {
        (**self).on_touch_event(action, pointer_id, x, y)
    }
}

//////////////////////////////////////////////////
// Native library

#[cfg(all(target_os = "android", feature = "pgdce"))]
mod native {
    use std::ptr;

    use jni::sys::{jboolean, jclass, jfloat, jint, jobject, jstring, JNIEnv as RawEnv, JNI_FALSE};
    use jni::JavaVM;
    use winit::platform::android::activity::AndroidApp;

    use super::{AssetManagerHandle, Engine};
    use crate::error::Result;

    // libpgdce exports its entry points as the static natives of
    // `com.pascalgamedevelopment.ce.PGDCELib`. Linking makes the dynamic loader
    // map the library together with the host; it stays resident until the
    // process ends.
    #[allow(non_snake_case)]
    #[link(name = "pgdce")]
    extern "system" {
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_init(env: *mut RawEnv, class: jclass, asset_manager: jobject);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onSurfaceCreated(env: *mut RawEnv, class: jclass);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onSurfaceChanged(env: *mut RawEnv, class: jclass, width: jint, height: jint);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_drawFrame(env: *mut RawEnv, class: jclass);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_setConfig(env: *mut RawEnv, class: jclass, config: jstring);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onPause(env: *mut RawEnv, class: jclass);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onResume(env: *mut RawEnv, class: jclass);
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onKeyEvent(env: *mut RawEnv, class: jclass, action: jint, key_code: jint, scan_code: jint) -> jboolean;
        fn Java_com_pascalgamedevelopment_ce_PGDCELib_onTouchEvent(env: *mut RawEnv, class: jclass, action: jint, pointer_id: jint, x: jfloat, y: jfloat) -> jboolean;
    }

    /// Engine backed by libpgdce.
    pub struct NativeEngine {
        vm: JavaVM,
        // kept for the lifetime of the engine, native code holds on to it
        assets: AssetManagerHandle,
    }

    impl NativeEngine {
        pub fn new(android_app: &AndroidApp) -> Result<Self> {
            Ok(NativeEngine {
                vm: crate::android::java_vm(android_app)?,
                assets: AssetManagerHandle::detached(),
            })
        }

        // The natives are declared static and never look at their class argument.
        // The calling thread stays attached, so per-frame calls do not re-attach.
        fn call<T: Default>(&self, name: &str, f: impl FnOnce(&mut jni::JNIEnv<'_>, jclass) -> T) -> T {
            match self.vm.attach_current_thread_permanently() {
                Ok(mut env) => f(&mut env, ptr::null_mut()),
                Err(err) => {
                    log::error!("Failed to attach thread for {}: {}", name, err);
                    T::default()
                }
            }
        }
    }

    impl std::fmt::Debug for NativeEngine {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("NativeEngine").field("assets", &self.assets).finish()
        }
    }

    impl Engine for NativeEngine {
        fn init(&mut self, assets: &AssetManagerHandle) {
            log::info!("Initializing native engine (assets attached: {})", assets.is_attached());
            self.assets = assets.clone();
            let asset_manager = self.assets.as_raw();
            self.call("init", |env, class| unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_init(env.get_raw(), class, asset_manager) })
        }

        fn on_surface_created(&mut self) {
            self.call("onSurfaceCreated", |env, class| unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_onSurfaceCreated(env.get_raw(), class) })
        }

        fn on_surface_changed(&mut self, width: i32, height: i32) {
            self.call("onSurfaceChanged", |env, class| unsafe {
                Java_com_pascalgamedevelopment_ce_PGDCELib_onSurfaceChanged(env.get_raw(), class, width, height)
            })
        }

        fn draw_frame(&mut self) {
            self.call("drawFrame", |env, class| unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_drawFrame(env.get_raw(), class) })
        }

        fn set_config(&mut self, config: &str) {
            self.call("setConfig", |env, class| match env.new_string(config) {
                Ok(config) => {
                    unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_setConfig(env.get_raw(), class, config.as_raw()) };
                    let _ = env.delete_local_ref(config);
                }
                Err(err) => log::error!("Failed to pass engine config: {}", err),
            })
        }

        fn on_pause(&mut self) {
            self.call("onPause", |env, class| unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_onPause(env.get_raw(), class) })
        }

        fn on_resume(&mut self) {
            self.call("onResume", |env, class| unsafe { Java_com_pascalgamedevelopment_ce_PGDCELib_onResume(env.get_raw(), class) })
        }

        fn on_key_event(&mut self, action: i32, key_code: i32, scan_code: i32) -> bool {
            self.call("onKeyEvent", |env, class| unsafe {
                Java_com_pascalgamedevelopment_ce_PGDCELib_onKeyEvent(env.get_raw(), class, action, key_code, scan_code) != JNI_FALSE
            })
        }

        fn on_touch_event(&mut self, action: i32, pointer_id: i32, x: f32, y: f32) -> bool {
            self.call("onTouchEvent", |env, class| unsafe {
                Java_com_pascalgamedevelopment_ce_PGDCELib_onTouchEvent(env.get_raw(), class, action, pointer_id, x, y) != JNI_FALSE
            })
        }
    }
}

#[cfg(all(target_os = "android", feature = "pgdce"))]
pub use native::NativeEngine;

//////////////////////////////////////////////////
// Tests
