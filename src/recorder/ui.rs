//! DOM wiring for the recorder widget: button listeners, per-phase control
//! visibility, the status badge and the initial prompt heading.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Document;

use crate::recorder::state::{Control, Phase, RecorderHandle};
use crate::recorder::web::WebBackend;

thread_local! {
    static WIDGET: RefCell<Option<RecorderHandle<WebBackend>>> = RefCell::new(None);
}

/// Wire the widget onto the host page. Expects the element ids used in
/// static/index.html: `preview`, `start-preview`, `start-recording`,
/// `toggle-pause`, `stop-recording`, `recorder-status`, `recorder-prompt`.
#[wasm_bindgen]
pub fn init_recorder_widget() -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let widget = RecorderHandle::new(WebBackend::new(&document)?);
    widget.set_phase_listener(Box::new(apply_phase));

    wire_click(&document, "start-preview", {
        let widget = widget.clone();
        move || widget.request_preview()
    })?;
    wire_click(&document, "start-recording", {
        let widget = widget.clone();
        move || widget.begin_recording()
    })?;
    wire_click(&document, "toggle-pause", {
        let widget = widget.clone();
        move || widget.toggle_pause()
    })?;
    wire_click(&document, "stop-recording", {
        let widget = widget.clone();
        move || widget.end_recording()
    })?;

    apply_phase(widget.phase());
    WIDGET.with(|slot| *slot.borrow_mut() = Some(widget));

    log::info!("Recorder widget initialized");
    Ok(())
}

/// Explicit teardown: stop any open session and release the device.
#[wasm_bindgen]
pub fn dispose_recorder_widget() {
    let widget = WIDGET.with(|slot| slot.borrow_mut().take());
    if let Some(widget) = widget {
        widget.dispose();
        log::info!("Recorder widget disposed");
    }
}

fn wire_click(
    document: &Document,
    id: &str,
    mut action: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("{} element not found", id)))?;
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        action();
    }) as Box<dyn FnMut(_)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Re-render the control set for the phase.
fn apply_phase(phase: Phase) {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };

    let controls = phase.controls();
    set_display(
        &document,
        "start-preview",
        controls.contains(&Control::StartPreview),
        "inline-block",
    );
    set_display(
        &document,
        "start-recording",
        controls.contains(&Control::StartRecording),
        "inline-block",
    );
    let pausable = controls.contains(&Control::Pause) || controls.contains(&Control::Resume);
    set_display(&document, "toggle-pause", pausable, "inline-block");
    set_display(
        &document,
        "stop-recording",
        controls.contains(&Control::Stop),
        "inline-block",
    );

    if let Some(button) = document.get_element_by_id("toggle-pause") {
        let label = if controls.contains(&Control::Resume) {
            "Resume"
        } else {
            "Pause"
        };
        button.set_text_content(Some(label));
        let _ = button.set_attribute("title", label);
    }

    // The prompt heading only shows before the first successful preview.
    set_display(&document, "recorder-prompt", phase == Phase::Initial, "block");

    if let Some(badge) = document.get_element_by_id("recorder-status") {
        badge.set_text_content(Some(phase.status_label()));
        badge.set_class_name(&format!(
            "status-badge {}",
            phase.status_label().to_lowercase()
        ));
    }
}

fn set_display(document: &Document, id: &str, visible: bool, shown: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        if let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() {
            let display = if visible { shown } else { "none" };
            element.style().set_property("display", display).ok();
        }
    }
}
