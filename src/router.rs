/// Request routing for the background service worker.
///
/// A UI surface sends one `Request` over the runtime message channel and
/// gets exactly one `Response` back, success or not.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::bookmark::{BookmarkRecord, SavePageData, TabInfo};
use crate::error::{BookmarkError, js_error_message};
use crate::storage::StorageBackend;
use crate::store::Store;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> Result<JsValue, JsValue>;
}

/// Messages understood by the background worker, keyed by `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    SavePage {
        data: SavePageData,
    },
    GetItems,
    DeleteItem {
        #[serde(rename = "itemId")]
        item_id: String,
    },
    GetCurrentTabInfo,
}

/// Uniform reply envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Record(BookmarkRecord),
    Records(Vec<BookmarkRecord>),
    Tab(TabInfo),
}

impl Response {
    pub fn with_data(data: ResponseData) -> Self {
        Response {
            success: true,
            data: Some(data),
            item_id: None,
            error: None,
        }
    }

    pub fn with_item_id(item_id: String) -> Self {
        Response {
            success: true,
            data: None,
            item_id: Some(item_id),
            error: None,
        }
    }

    pub fn failure(err: &BookmarkError) -> Self {
        Response {
            success: false,
            data: None,
            item_id: None,
            error: Some(err.to_string()),
        }
    }

    /// Error message of a failed response, or a fallback when the worker sent none
    pub fn error_or(&self, fallback: &str) -> String {
        self.error.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Source of "what page is the user looking at"
#[allow(async_fn_in_trait)]
pub trait TabSource {
    async fn active_tab(&self) -> Result<Option<TabInfo>, BookmarkError>;
}

/// `chrome.tabs.query({active: true, currentWindow: true})`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabSource for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>, BookmarkError> {
        let tab_js = queryActiveTab()
            .await
            .map_err(|e| BookmarkError::Storage(js_error_message(&e)))?;

        if tab_js.is_null() || tab_js.is_undefined() {
            return Ok(None);
        }

        // Tabs without a readable url (e.g. missing permission) count as unresolvable
        Ok(serde_wasm_bindgen::from_value::<RawTab>(tab_js)
            .ok()
            .and_then(RawTab::into_tab_info))
    }
}

/// Subset of a `chrome.tabs.Tab` object
#[derive(Debug, Deserialize)]
pub(crate) struct RawTab {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl RawTab {
    pub(crate) fn into_tab_info(self) -> Option<TabInfo> {
        let url = self.url.filter(|url| !url.is_empty())?;
        Some(TabInfo::new(url, self.title.as_deref()))
    }
}

pub struct Router<B, T> {
    store: Store<B>,
    tabs: T,
}

impl<B: StorageBackend, T: TabSource> Router<B, T> {
    pub fn new(store: Store<B>, tabs: T) -> Self {
        Router { store, tabs }
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    /// Decode an untyped message and dispatch it; malformed input still gets a reply
    pub async fn handle_value(&self, raw: Value) -> Response {
        match serde_json::from_value::<Request>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                log::warn!("Unsupported message: {}", e);
                Response::failure(&BookmarkError::InvalidRequest(e.to_string()))
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        let result = match request {
            Request::SavePage { data } => self
                .store
                .create(data.into_record())
                .await
                .map(|record| Response::with_data(ResponseData::Record(record))),
            Request::GetItems => self
                .store
                .list_all()
                .await
                .map(|items| Response::with_data(ResponseData::Records(items))),
            Request::DeleteItem { item_id } => self
                .store
                .delete_by_id(&item_id)
                .await
                .map(Response::with_item_id),
            Request::GetCurrentTabInfo => self
                .current_tab()
                .await
                .map(|tab| Response::with_data(ResponseData::Tab(tab))),
        };

        result.unwrap_or_else(|err| {
            log::warn!("Request failed: {}", err);
            Response::failure(&err)
        })
    }

    async fn current_tab(&self) -> Result<TabInfo, BookmarkError> {
        match self.tabs.active_tab().await {
            Ok(Some(tab)) => Ok(tab),
            Ok(None) => Err(BookmarkError::TabResolution),
            Err(e) => {
                log::error!("Tab query failed: {}", e);
                Err(BookmarkError::TabResolution)
            }
        }
    }
}
