//////////////////////////////////////////////////
// Using

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

//////////////////////////////////////////////////
// Traits

/// User visible, non-blocking message.
pub trait Notice {
    fn show(&self, message: &str);
}

//////////////////////////////////////////////////
// Definition

/// Writes notices to the log only.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogNotice;

/// Shows notices as a long toast and writes them to the log.
///
/// The toast is created on the `android_main` thread, which gets a looper of
/// its own but never runs it. Apps targeting API 30 or later get text toasts
/// rendered by the system; elsewhere the toast handler is never pumped and only the
/// log entry remains.
#[cfg(target_os = "android")]
#[derive(Debug)]
pub struct ToastNotice {
    android_app: AndroidApp,
}

//////////////////////////////////////////////////
// Implementation

impl Notice for LogNotice {
    fn show(&self, message: &str) {
        log::error!("{}", message);
    }
}

#[cfg(target_os = "android")]
const TOAST_LENGTH_LONG: i32 = 1;

#[cfg(target_os = "android")]
impl ToastNotice {
    pub fn new(android_app: AndroidApp) -> Self {
        ToastNotice { android_app }
    }
}

#[cfg(target_os = "android")]
impl Notice for ToastNotice {
    fn show(&self, message: &str) {
        use jni::objects::{JObject, JValue};

        log::error!("{}", message);
        let shown = crate::android::with_activity(&self.android_app, |env, activity| {
            // Toast needs a looper on the calling thread
            let looper = env.call_static_method("android/os/Looper", "myLooper", "()Landroid/os/Looper;", &[])?.l()?;
            if looper.is_null() {
                env.call_static_method("android/os/Looper", "prepare", "()V", &[])?;
            }

            let text = JObject::from(env.new_string(message)?);
            let toast = env
                .call_static_method(
                    "android/widget/Toast",
                    "makeText",
                    "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                    &[JValue::Object(activity), JValue::Object(&text), JValue::Int(TOAST_LENGTH_LONG)],
                )?
                .l()?;
            env.call_method(&toast, "show", "()V", &[])?;
            Ok(())
        });
        if let Err(err) = shown {
            log::warn!("Failed to show toast: {}", err);
        }
    }
}
