//! Camera/microphone recording widget: preview, record with pause/resume,
//! download the finished clip.

pub mod backend;
pub mod download;
pub mod error;
pub mod media_recorder;
pub mod media_streams;
pub mod state;
pub mod ui;
pub mod web;

#[cfg(test)]
mod fake;

pub use backend::{MediaBackend, StreamConstraints};
pub use state::{Control, Phase, RecorderHandle};

/// Suggested filename for the assembled clip.
pub const CLIP_FILENAME: &str = "recording.webm";
/// Container type declared on the assembled clip.
pub const CLIP_MIME_TYPE: &str = "video/webm";
