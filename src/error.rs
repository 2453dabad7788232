/// Error taxonomy for bookmark storage and message handling
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Every failure the background worker can report back to a UI surface.
///
/// The `Display` text is exactly what ends up in the `error` field of a
/// response envelope, so the popup can show it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    #[error("This page is already saved.")]
    DuplicateUrl(String),

    #[error("Item not found for deletion.")]
    NotFound(String),

    /// Failure reported by the storage layer, surfaced verbatim
    #[error("{0}")]
    Storage(String),

    #[error("Could not get current tab information.")]
    TabResolution,

    #[error("A bookmark needs a non-empty URL.")]
    InvalidUrl,

    #[error("Unsupported request: {0}")]
    InvalidRequest(String),
}

impl BookmarkError {
    pub fn storage(err: impl ToString) -> Self {
        BookmarkError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BookmarkError {
    fn from(err: serde_json::Error) -> Self {
        BookmarkError::Storage(format!("Failed to parse stored items: {}", err))
    }
}

/// Best-effort human readable message for a rejected bridge promise.
///
/// `chrome.runtime.lastError` and thrown `Error`s carry a `message`; plain
/// strings are used as is.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
