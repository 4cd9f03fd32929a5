/// Tab Idler - Chrome Extension that suggests inactive tabs to close
/// Built with Rust + WASM + Yew

pub mod background;
pub mod chrome;
pub mod error;
pub mod events;
pub mod host;
pub mod messages;
pub mod ranking;
pub mod settings;
pub mod storage;
pub mod tab_data;
pub mod tracker;
pub mod ui;
pub mod urls;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the background services for the service worker
#[wasm_bindgen]
pub fn start_background() -> background::Background {
    background::start()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
