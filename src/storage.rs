/// Storage backends and the in-memory shape of the persisted collection

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::bookmark::BookmarkRecord;
use crate::error::{BookmarkError, js_error_message};

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// Newest-first list of saved pages, as stored under one key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub items: Vec<BookmarkRecord>,
}

impl Collection {
    pub fn new() -> Self {
        Collection { items: Vec::new() }
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    /// Put a record at the front of the list
    pub fn prepend(&mut self, record: BookmarkRecord) {
        self.items.insert(0, record);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < original_len
    }

    pub fn get(&self, id: &str) -> Option<&BookmarkRecord> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<BookmarkRecord> {
        self.items
    }
}

/// A single-key-at-a-time key/value store.
///
/// `get` yields `None` for a key that has never been written.
#[allow(async_fn_in_trait)]
pub trait StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, BookmarkError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), BookmarkError>;
}

/// `chrome.storage.local` through the background bridge
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl StorageBackend for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, BookmarkError> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| BookmarkError::Storage(js_error_message(&e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| BookmarkError::Storage(format!("Failed to parse storage: {}", e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), BookmarkError> {
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| BookmarkError::Storage(format!("Failed to serialize storage: {}", e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| BookmarkError::Storage(js_error_message(&e)))
    }
}

/// Process-local backend; single threaded like the service worker it stands in for
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a slot, for inspection
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.slots.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, BookmarkError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), BookmarkError> {
        self.slots.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}
