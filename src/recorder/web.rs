//! Production backend over web-sys: getUserMedia capture, MediaRecorder
//! sessions, Blob downloads, window.alert notices.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, Document, HtmlVideoElement, MediaStream};

use crate::recorder::backend::{
    AcquireCallback, FinalizeCallback, FragmentCallback, MediaBackend, StreamConstraints,
};
use crate::recorder::download;
use crate::recorder::error::{SaveError, SessionError};
use crate::recorder::media_recorder::RecorderSession;
use crate::recorder::media_streams::{self, describe};

pub struct WebBackend {
    preview: HtmlVideoElement,
}

impl WebBackend {
    /// Look up the preview surface on the host page.
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let preview: HtmlVideoElement = document
            .get_element_by_id("preview")
            .ok_or("preview element not found")?
            .dyn_into()?;
        Ok(Self { preview })
    }
}

impl MediaBackend for WebBackend {
    type Stream = MediaStream;
    type Session = RecorderSession;
    type Fragment = Blob;
    type Clip = Blob;

    fn acquire(&mut self, constraints: StreamConstraints, done: AcquireCallback<MediaStream>) {
        wasm_bindgen_futures::spawn_local(async move {
            done(media_streams::acquire_stream(constraints).await);
        });
    }

    fn bind_preview(&mut self, stream: &MediaStream) {
        self.preview.set_src_object(Some(stream));
        // Muted so the local monitor does not feed back into the mic.
        self.preview.set_muted(true);
        let _ = self.preview.play();
    }

    fn release(&mut self, stream: MediaStream) {
        self.preview.set_src_object(None);
        media_streams::stop_stream(&stream);
    }

    fn open_session(
        &mut self,
        stream: &MediaStream,
        on_fragment: FragmentCallback<Blob>,
        on_finalize: FinalizeCallback,
    ) -> Result<RecorderSession, SessionError> {
        RecorderSession::new(stream, on_fragment, on_finalize)
            .map_err(|e| SessionError::OpenFailed(describe(&e)))
    }

    fn start(&mut self, session: &RecorderSession) -> Result<(), SessionError> {
        session.start().map_err(|e| control_failed("start", &e))
    }

    fn pause(&mut self, session: &RecorderSession) -> Result<(), SessionError> {
        session.pause().map_err(|e| control_failed("pause", &e))
    }

    fn resume(&mut self, session: &RecorderSession) -> Result<(), SessionError> {
        session.resume().map_err(|e| control_failed("resume", &e))
    }

    fn stop(&mut self, session: &RecorderSession) -> Result<(), SessionError> {
        session.stop().map_err(|e| control_failed("stop", &e))
    }

    fn assemble(&mut self, fragments: Vec<Blob>) -> Result<Blob, SaveError> {
        download::assemble_clip(fragments).map_err(|e| SaveError::Assemble(describe(&e)))
    }

    fn download(&mut self, clip: Blob, filename: &str) -> Result<(), SaveError> {
        download::trigger_download(&clip, filename).map_err(|e| SaveError::Dispatch(describe(&e)))
    }

    fn notify(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

fn control_failed(op: &'static str, err: &JsValue) -> SessionError {
    SessionError::ControlFailed {
        op,
        reason: describe(err),
    }
}
