//! Clip assembly and client-side save via a transient object URL.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::recorder::CLIP_MIME_TYPE;

/// Concatenate fragments, in emission order, into one webm clip.
pub fn assemble_clip(fragments: Vec<Blob>) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::new();
    for fragment in &fragments {
        parts.push(fragment);
    }
    let mut options = BlobPropertyBag::new();
    options.set_type(CLIP_MIME_TYPE);
    Blob::new_with_blob_sequence_and_options(&parts, &options)
}

/// Trigger the browser save dialog through a hidden anchor click. The
/// object URL is revoked as soon as the click has been dispatched.
pub fn trigger_download(clip: &Blob, filename: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;
    let body = document.body().ok_or("No body")?;

    let url = Url::create_object_url_with_blob(clip)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.style().set_property("display", "none")?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    body.append_child(&anchor)?;
    anchor.click();
    let _ = body.remove_child(&anchor);

    Url::revoke_object_url(&url)?;
    Ok(())
}
