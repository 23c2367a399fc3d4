//! Error types for the application core.
//!
//! [`AppError`] covers everything the application handle and its renderer can
//! fail on. The bootstrap sequence wraps it in [`crate::boot::BootError`] to
//! record which step failed. Both convert into [`JsValue`] at the wasm boundary.

use wasm_bindgen::JsValue;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure inside the application core or its host bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// The host exposes no global window object.
    #[error("host window is unavailable")]
    WindowMissing,
    /// No canvas element was found under the requested id.
    #[error("canvas element #{0} not found")]
    CanvasMissing(String),
    /// The canvas could not provide the requested rendering context.
    #[error("rendering context {0:?} is unavailable")]
    ContextUnavailable(String),
    /// A shader stage failed to compile. Carries the driver info log.
    #[error("shader compilation failed: {0}")]
    Shader(String),
    /// The shader program failed to link. Carries the driver info log.
    #[error("program link failed: {0}")]
    Link(String),
    /// A GPU buffer could not be allocated.
    #[error("failed to create buffer")]
    Buffer,
    /// Mesh data is internally inconsistent.
    #[error("invalid mesh: {0}")]
    Mesh(String),
    /// Any other exception thrown by a host API.
    #[error("host error: {0}")]
    Js(String),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{value:?}")),
        }
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
