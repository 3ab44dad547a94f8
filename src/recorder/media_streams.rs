//! getUserMedia adapter: request the capture stream and manage its tracks.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::recorder::backend::StreamConstraints;
use crate::recorder::error::CaptureError;

/// Prompt for device access and resolve to a live stream.
pub async fn acquire_stream(constraints: StreamConstraints) -> Result<MediaStream, CaptureError> {
    let window = web_sys::window().ok_or_else(|| CaptureError::Other("no window".into()))?;
    let media_devices = window
        .navigator()
        .media_devices()
        .map_err(|e| CaptureError::Other(describe(&e)))?;

    let mut request = MediaStreamConstraints::new();
    request.set_audio(&JsValue::from_bool(constraints.audio));
    request.set_video(&JsValue::from_bool(constraints.video));

    let promise = media_devices
        .get_user_media_with_constraints(&request)
        .map_err(|e| CaptureError::Other(describe(&e)))?;
    let stream_js = JsFuture::from(promise)
        .await
        .map_err(|e| classify_rejection(&e))?;
    Ok(MediaStream::from(stream_js))
}

/// Map a getUserMedia rejection to the widget's error taxonomy by the
/// DOMException name.
fn classify_rejection(err: &JsValue) -> CaptureError {
    let name = js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    match name.as_str() {
        "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
            CaptureError::PermissionDenied
        }
        "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => {
            CaptureError::NoDevice
        }
        _ => CaptureError::Other(describe(err)),
    }
}

pub fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Stop every track so the device recording indicator turns off.
pub fn stop_stream(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        let track = MediaStreamTrack::from(tracks.get(i));
        track.stop();
    }
}
