/// Entry points called by the service worker script

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::config::{CONTEXT_MENU_ID, CONTEXT_MENU_TITLE};
use crate::context_menu::{MenuClick, save_clicked_page};
use crate::error::js_error_message;
use crate::router::{ChromeTabs, RawTab, Router};
use crate::storage::ChromeStorage;
use crate::store::Store;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn createContextMenu(id: &str, title: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn showNotification(options: JsValue) -> Result<(), JsValue>;
}

/// `chrome.runtime.onInstalled`: seed storage and register the context menu
#[wasm_bindgen]
pub async fn on_installed() {
    log::info!("OpenPocket extension installed.");

    if let Err(e) = Store::new(ChromeStorage).init().await {
        log::error!("Failed to initialize storage: {}", e);
    }

    if let Err(e) = createContextMenu(CONTEXT_MENU_ID, CONTEXT_MENU_TITLE).await {
        log::error!("Failed to create context menu: {}", js_error_message(&e));
    }
}

/// `chrome.runtime.onMessage`: always resolves with a response envelope
#[wasm_bindgen]
pub async fn handle_message(request: JsValue) -> Result<JsValue, JsValue> {
    let raw: Value = serde_wasm_bindgen::from_value(request).unwrap_or(Value::Null);

    let router = Router::new(Store::new(ChromeStorage), ChromeTabs);
    let response = router.handle_value(raw).await;

    response
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `chrome.contextMenus.onClicked`
#[wasm_bindgen]
pub async fn on_context_menu_clicked(info: JsValue, tab: JsValue) {
    let click: MenuClick = match serde_wasm_bindgen::from_value(info) {
        Ok(click) => click,
        Err(e) => {
            log::warn!("Ignoring context menu click: {}", e);
            return;
        }
    };

    let tab: Option<RawTab> = if tab.is_null() || tab.is_undefined() {
        None
    } else {
        serde_wasm_bindgen::from_value(tab).ok()
    };

    let store = Store::new(ChromeStorage);
    let Some(notification) = save_clicked_page(&store, &click, tab).await else {
        return;
    };

    let options = match notification.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(options) => options,
        Err(e) => {
            log::error!("Failed to build notification: {}", e);
            return;
        }
    };

    if let Err(e) = showNotification(options).await {
        log::error!("Failed to show notification: {}", js_error_message(&e));
    }
}
