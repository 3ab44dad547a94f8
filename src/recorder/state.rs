//! Widget state machine: one phase enum, one stream, one session.

use std::cell::RefCell;
use std::rc::Rc;

use crate::recorder::backend::{MediaBackend, StreamConstraints};
use crate::recorder::error::CaptureError;
use crate::recorder::CLIP_FILENAME;

/// UI phase. Exactly one is active at a time, so the unreachable flag
/// combinations of the boolean-per-feature approach cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing acquired yet; the page shows the start-preview prompt.
    Initial,
    /// Camera live in the preview element, not recording.
    PreviewReady,
    Recording,
    Paused,
}

/// A control the host page renders for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    StartPreview,
    StartRecording,
    Pause,
    Resume,
    Stop,
}

impl Phase {
    /// The exact control set the page shows in this phase.
    pub fn controls(self) -> &'static [Control] {
        match self {
            Phase::Initial => &[Control::StartPreview],
            Phase::PreviewReady => &[Control::StartRecording],
            Phase::Recording => &[Control::Pause, Control::Stop],
            Phase::Paused => &[Control::Resume, Control::Stop],
        }
    }

    /// Text for the status badge on the host page.
    pub fn status_label(self) -> &'static str {
        match self {
            Phase::Initial => "Idle",
            Phase::PreviewReady => "Ready",
            Phase::Recording => "Recording",
            Phase::Paused => "Paused",
        }
    }
}

/// An open recording session plus the fragment buffer it owns. The buffer
/// is append-only, kept in emission order, and drained exactly once when
/// the session finalizes.
struct ActiveSession<B: MediaBackend> {
    session: B::Session,
    fragments: Rc<RefCell<Vec<B::Fragment>>>,
}

pub struct RecorderWidget<B: MediaBackend> {
    backend: B,
    phase: Phase,
    stream: Option<B::Stream>,
    active: Option<ActiveSession<B>>,
    phase_listener: Option<Box<dyn Fn(Phase)>>,
}

impl<B: MediaBackend> RecorderWidget<B> {
    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if let Some(listener) = self.phase_listener.as_ref() {
            listener(phase);
        }
    }
}

impl<B: MediaBackend> Drop for RecorderWidget<B> {
    fn drop(&mut self) {
        // The device recording indicator must turn off even on abnormal
        // teardown.
        if let Some(stream) = self.stream.take() {
            self.backend.release(stream);
        }
    }
}

/// Shared handle to the single widget instance. Platform callbacks hold
/// clones of this and re-enter the widget on their own event-loop turn.
pub struct RecorderHandle<B: MediaBackend> {
    state: Rc<RefCell<RecorderWidget<B>>>,
}

impl<B: MediaBackend> Clone for RecorderHandle<B> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<B: MediaBackend + 'static> RecorderHandle<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: Rc::new(RefCell::new(RecorderWidget {
                backend,
                phase: Phase::Initial,
                stream: None,
                active: None,
                phase_listener: None,
            })),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// The listener fires on every phase update, including the reset after
    /// a failed capture request. It must not call back into the widget.
    pub fn set_phase_listener(&self, listener: Box<dyn Fn(Phase)>) {
        self.state.borrow_mut().phase_listener = Some(listener);
    }

    /// Ask for camera+microphone access and bind the preview on success.
    /// The phase stays Initial until the platform resolves the request.
    pub fn request_preview(&self) {
        let me = self.clone();
        let w = &mut *self.state.borrow_mut();
        if w.phase != Phase::Initial {
            return;
        }
        log::info!("Requesting camera preview");
        w.backend.acquire(
            StreamConstraints::AUDIO_VIDEO,
            Box::new(move |result| me.finish_acquire(result)),
        );
    }

    fn finish_acquire(&self, result: Result<B::Stream, CaptureError>) {
        let w = &mut *self.state.borrow_mut();
        match result {
            Ok(stream) => {
                if w.phase != Phase::Initial {
                    // A duplicate request resolved after an earlier one
                    // already bound a stream. Keep a single live handle.
                    log::warn!("Dropping late capture result in phase {:?}", w.phase);
                    w.backend.release(stream);
                    return;
                }
                if let Some(old) = w.stream.take() {
                    w.backend.release(old);
                }
                w.backend.bind_preview(&stream);
                w.stream = Some(stream);
                log::info!("Camera preview active");
                w.set_phase(Phase::PreviewReady);
            }
            Err(err) => {
                log::warn!("Capture request failed: {}", err);
                w.backend.notify("Camera permission not granted!!");
                if let Some(old) = w.stream.take() {
                    w.backend.release(old);
                }
                w.set_phase(Phase::Initial);
            }
        }
    }

    /// Open and start a recording session on the live stream.
    pub fn begin_recording(&self) {
        let me = self.clone();
        let w = &mut *self.state.borrow_mut();
        if w.phase != Phase::PreviewReady || w.active.is_some() {
            return;
        }
        // Unreachable through the UI, which only offers the control once a
        // preview stream is bound.
        let Some(stream) = w.stream.as_ref() else {
            return;
        };

        let fragments: Rc<RefCell<Vec<B::Fragment>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fragments);
        let on_fragment = Box::new(move |fragment: B::Fragment| {
            sink.borrow_mut().push(fragment);
        });
        let on_finalize = Box::new(move || me.finish_recording());

        let session = match w.backend.open_session(stream, on_fragment, on_finalize) {
            Ok(session) => session,
            Err(err) => {
                log::error!("Failed to open recording session: {}", err);
                w.backend.notify("Recording could not be started");
                return;
            }
        };
        if let Err(err) = w.backend.start(&session) {
            log::error!("Failed to start recording session: {}", err);
            w.backend.notify("Recording could not be started");
            return;
        }

        w.active = Some(ActiveSession { session, fragments });
        log::info!("Recording started");
        w.set_phase(Phase::Recording);
    }

    /// Pause a running recording, or resume a paused one. A rejected
    /// control call leaves the phase unchanged; the user simply retries.
    pub fn toggle_pause(&self) {
        let w = &mut *self.state.borrow_mut();
        match w.phase {
            Phase::Recording => {
                let Some(active) = w.active.as_ref() else {
                    return;
                };
                match w.backend.pause(&active.session) {
                    Ok(()) => w.set_phase(Phase::Paused),
                    Err(err) => log::error!("Pause failed: {}", err),
                }
            }
            Phase::Paused => {
                let Some(active) = w.active.as_ref() else {
                    return;
                };
                match w.backend.resume(&active.session) {
                    Ok(()) => w.set_phase(Phase::Recording),
                    Err(err) => log::error!("Resume failed: {}", err),
                }
            }
            _ => {}
        }
    }

    /// Stop the session, from Recording or Paused alike. Finalization (and
    /// the phase change back to PreviewReady) happens when the backend
    /// delivers the finalize callback, after the last buffered fragment.
    pub fn end_recording(&self) {
        let w = &mut *self.state.borrow_mut();
        if !matches!(w.phase, Phase::Recording | Phase::Paused) {
            return;
        }
        let Some(active) = w.active.as_ref() else {
            return;
        };
        match w.backend.stop(&active.session) {
            Ok(()) => log::info!("Recording stopping, waiting for finalization"),
            Err(err) => {
                // The session is wedged; abandon it instead of leaving the
                // controls stuck on stop.
                log::error!("Stop failed, abandoning session: {}", err);
                w.active = None;
                w.set_phase(Phase::PreviewReady);
            }
        }
    }

    /// Finalize callback: assemble the buffered fragments into one clip,
    /// hand it to the save dialog, and keep the camera live for another
    /// take.
    fn finish_recording(&self) {
        let w = &mut *self.state.borrow_mut();
        let Some(active) = w.active.take() else {
            log::warn!("Finalize fired with no active session");
            return;
        };
        let fragments = std::mem::take(&mut *active.fragments.borrow_mut());
        log::info!("Assembling clip from {} fragments", fragments.len());
        match w.backend.assemble(fragments) {
            Ok(clip) => {
                if let Err(err) = w.backend.download(clip, CLIP_FILENAME) {
                    log::error!("Failed to dispatch download: {}", err);
                }
            }
            Err(err) => log::error!("Failed to assemble clip: {}", err),
        }
        w.set_phase(Phase::PreviewReady);
    }

    /// Tear the widget down, stopping any session and releasing the device
    /// so its recording indicator turns off.
    pub fn dispose(&self) {
        let w = &mut *self.state.borrow_mut();
        if let Some(active) = w.active.take() {
            if let Err(err) = w.backend.stop(&active.session) {
                log::warn!("Stop during teardown failed: {}", err);
            }
        }
        if let Some(stream) = w.stream.take() {
            w.backend.release(stream);
        }
        w.set_phase(Phase::Initial);
    }
}
