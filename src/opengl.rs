//////////////////////////////////////////////////
// Using

use std::ffi::CStr;

use crate::gl;
use crate::gl::types::*;
use crate::Gl;

//////////////////////////////////////////////////
// Strings

pub struct GlString;

impl GlString {
    pub fn get(gl: &Gl, name: GLenum) -> Option<String> {
        unsafe {
            let ptr = gl.GetString(name);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
            }
        }
    }
}

//////////////////////////////////////////////////
// Errors

/// Drains the GL error queue, logging every entry. Returns the number of errors.
pub fn check_error(gl: &Gl, description: &str) -> usize {
    let mut count = 0;
    let mut err = unsafe { gl.GetError() };
    while err != gl::NO_ERROR {
        log::error!("{}. ErrorCode {}", description, error_name(err));
        err = unsafe { gl.GetError() };
        count += 1;
    }
    count
}

pub fn error_name(err: GLenum) -> String {
    match err {
        gl::INVALID_ENUM => String::from("GL_INVALID_ENUM"),
        gl::INVALID_VALUE => String::from("GL_INVALID_VALUE"),
        gl::INVALID_OPERATION => String::from("GL_INVALID_OPERATION"),
        gl::INVALID_FRAMEBUFFER_OPERATION => String::from("GL_INVALID_FRAMEBUFFER_OPERATION"),
        gl::OUT_OF_MEMORY => String::from("GL_OUT_OF_MEMORY"),
        other => format!("0x{:04x}", other),
    }
}
