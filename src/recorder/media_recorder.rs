//! MediaRecorder adapter. The wrapper owns the `dataavailable` and `stop`
//! closures for the session's lifetime and detaches them on drop.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobEvent, MediaRecorder, MediaStream, RecordingState};

use crate::recorder::backend::{FinalizeCallback, FragmentCallback};

pub struct RecorderSession {
    recorder: MediaRecorder,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(web_sys::Event)>,
}

impl RecorderSession {
    pub fn new(
        stream: &MediaStream,
        mut on_fragment: FragmentCallback<Blob>,
        on_finalize: FinalizeCallback,
    ) -> Result<Self, JsValue> {
        let recorder = MediaRecorder::new_with_media_stream(stream)?;

        let on_data = Closure::wrap(Box::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                on_fragment(blob);
            }
        }) as Box<dyn FnMut(BlobEvent)>);
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        // Finalization is deferred by one task so the widget may drop this
        // session (and these closures) from inside the finalize path.
        let mut finalize = Some(on_finalize);
        let on_stop = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(finalize) = finalize.take() {
                wasm_bindgen_futures::spawn_local(async move { finalize() });
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        Ok(Self {
            recorder,
            _on_data: on_data,
            _on_stop: on_stop,
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.recorder.start()
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.recorder.pause()
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.recorder.resume()
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        // An inactive recorder has already fired its stop event.
        if self.recorder.state() == RecordingState::Inactive {
            return Ok(());
        }
        self.recorder.stop()
    }
}

impl Drop for RecorderSession {
    fn drop(&mut self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
    }
}
