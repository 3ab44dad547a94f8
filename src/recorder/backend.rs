//! Seam between the recorder widget and the platform media services.
//!
//! The widget drives capture, recording and save through this trait so the
//! state machine can be exercised natively against a deterministic fake
//! while the browser build plugs in the web-sys implementation.

use crate::recorder::error::{CaptureError, SaveError, SessionError};

/// Which kinds of tracks to request from the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub audio: bool,
    pub video: bool,
}

impl StreamConstraints {
    /// The widget always previews and records both tracks.
    pub const AUDIO_VIDEO: Self = Self {
        audio: true,
        video: true,
    };
}

/// Invoked once a capture request resolves.
pub type AcquireCallback<S> = Box<dyn FnOnce(Result<S, CaptureError>)>;
/// Invoked for every data fragment the session emits, in emission order.
pub type FragmentCallback<F> = Box<dyn FnMut(F)>;
/// Invoked exactly once, after the last fragment of a stopped session.
pub type FinalizeCallback = Box<dyn FnOnce()>;

pub trait MediaBackend {
    /// Live audio+video source, bound to the preview surface while held.
    type Stream: 'static;
    /// One recording lifecycle from start to stop.
    type Session: 'static;
    /// One chunk of encoded media data.
    type Fragment: 'static;
    /// The assembled recording.
    type Clip: 'static;

    /// Request device access. `done` fires on a later event-loop turn,
    /// never re-entrantly.
    fn acquire(&mut self, constraints: StreamConstraints, done: AcquireCallback<Self::Stream>);

    /// Attach the stream to the on-screen preview surface.
    fn bind_preview(&mut self, stream: &Self::Stream);

    /// Stop the device and detach it from the preview surface.
    fn release(&mut self, stream: Self::Stream);

    /// Open a recording session on the stream. Fragments arrive in capture
    /// order; `on_finalize` fires only after the last fragment.
    fn open_session(
        &mut self,
        stream: &Self::Stream,
        on_fragment: FragmentCallback<Self::Fragment>,
        on_finalize: FinalizeCallback,
    ) -> Result<Self::Session, SessionError>;

    fn start(&mut self, session: &Self::Session) -> Result<(), SessionError>;
    fn pause(&mut self, session: &Self::Session) -> Result<(), SessionError>;
    fn resume(&mut self, session: &Self::Session) -> Result<(), SessionError>;

    /// Request finalization. Already-captured fragments keep arriving until
    /// the finalize callback fires.
    fn stop(&mut self, session: &Self::Session) -> Result<(), SessionError>;

    /// Concatenate fragments, preserving order, into one clip.
    fn assemble(&mut self, fragments: Vec<Self::Fragment>) -> Result<Self::Clip, SaveError>;

    /// Hand the clip to the browser's save dialog.
    fn download(&mut self, clip: Self::Clip, filename: &str) -> Result<(), SaveError>;

    /// Blocking user-visible notice.
    fn notify(&mut self, message: &str);
}
