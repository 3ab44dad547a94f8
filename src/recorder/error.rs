//! Error types for the recorder widget.

use thiserror::Error;

/// Errors raised while requesting camera/microphone access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user denied the permission prompt
    #[error("camera/microphone permission denied")]
    PermissionDenied,

    /// No usable capture device is attached
    #[error("no capture device found")]
    NoDevice,

    /// Anything else the platform reports
    #[error("capture failed: {0}")]
    Other(String),
}

/// Errors raised by the recording session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The recorder could not be constructed on the stream
    #[error("could not open recording session: {0}")]
    OpenFailed(String),

    /// A start/pause/resume/stop control call was rejected
    #[error("recorder control '{op}' failed: {reason}")]
    ControlFailed { op: &'static str, reason: String },
}

/// Errors raised while assembling or saving the finished clip
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Fragment concatenation failed
    #[error("could not assemble clip: {0}")]
    Assemble(String),

    /// The save dialog could not be triggered
    #[error("could not dispatch download: {0}")]
    Dispatch(String),
}
