/// Data structures for OpenPocket
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::UNTITLED_PAGE;

/// A saved page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    pub url: String,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date_added: String,
}

impl BookmarkRecord {
    /// Build a fresh record stamped with a new id and the current time
    pub fn new(url: String, title: Option<&str>, tags: Vec<String>) -> BookmarkRecord {
        BookmarkRecord {
            id: Uuid::new_v4().to_string(),
            url,
            title: title_or_placeholder(title),
            tags,
            date_added: now_iso8601(),
        }
    }
}

/// Payload of a `savePage` request.
///
/// Only `url` is mandatory in practice; everything else is filled in when
/// the record is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

impl SavePageData {
    pub fn into_record(self) -> BookmarkRecord {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let date_added = self.date_added.unwrap_or_else(now_iso8601);

        BookmarkRecord {
            id,
            title: title_or_placeholder(self.title.as_deref()),
            url: self.url,
            tags: self.tags,
            date_added,
        }
    }
}

/// URL and title of the page in the active tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub url: String,
    #[serde(default = "untitled")]
    pub title: String,
}

impl TabInfo {
    pub fn new(url: String, title: Option<&str>) -> TabInfo {
        TabInfo {
            url,
            title: title_or_placeholder(title),
        }
    }
}

/// Split a comma separated tag field, dropping blanks
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Loose check used by the popup before saving
pub fn is_valid_page_url(url: &str) -> bool {
    !url.is_empty() && url.starts_with("http")
}

pub fn title_or_placeholder(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => untitled(),
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn untitled() -> String {
    UNTITLED_PAGE.to_string()
}
