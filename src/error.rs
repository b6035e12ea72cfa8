//////////////////////////////////////////////////
// Using

use thiserror::Error;

//////////////////////////////////////////////////
// Definition

#[derive(Error, Debug)]
pub enum HostError {
    /// The device can not run an OpenGL ES 2.0 surface. This screen is abandoned.
    #[error("This device does not support OpenGL ES 2.0.")]
    Es2Unsupported,
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create display: {0}")]
    Display(String),
    #[error("OpenGL error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("Window handle error: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
    #[error("Surface is not ready")]
    SurfaceNotReady,
    #[cfg(target_os = "android")]
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
