//////////////////////////////////////////////////
// Using

use jni::objects::JObject;
use jni::{JNIEnv, JavaVM};
use winit::platform::android::activity::AndroidApp;

use crate::error::Result;

//////////////////////////////////////////////////
// JNI access

// Local references created inside `f` are released with the local frame.
const LOCAL_FRAME_CAPACITY: i32 = 16;

pub(crate) fn java_vm(android_app: &AndroidApp) -> Result<JavaVM> {
    Ok(unsafe { JavaVM::from_raw(android_app.vm_as_ptr().cast()) }?)
}

/// Runs `f` with an attached environment and the activity object.
pub(crate) fn with_activity<T, F>(android_app: &AndroidApp, f: F) -> Result<T>
where
    F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<T>,
{
    let vm = java_vm(android_app)?;
    let mut env = vm.attach_current_thread()?;
    let activity = unsafe { JObject::from_raw(android_app.activity_as_ptr().cast()) };

    let result = env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| f(env, &activity));
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    Ok(result?)
}
