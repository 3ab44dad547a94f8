use wasm_bindgen::prelude::*;

pub mod recorder;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("WASM recorder module initialized");
}
