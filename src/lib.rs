/// OpenPocket - Chrome Extension for saving pages to read later
/// Built with Rust + WASM + Yew

pub mod background;
pub mod bookmark;
pub mod config;
mod context_menu;
pub mod error;
pub mod router;
pub mod search;
pub mod storage;
pub mod store;
pub mod ui;

use wasm_bindgen::prelude::*;

pub use bookmark::{BookmarkRecord, SavePageData, TabInfo};
pub use error::BookmarkError;
pub use router::{Request, Response, ResponseData, Router, TabSource};
pub use storage::{ChromeStorage, MemoryStorage, StorageBackend};
pub use store::Store;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
