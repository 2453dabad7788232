/// "Save to OpenPocket" page context menu

use serde::{Deserialize, Serialize};

use crate::bookmark::BookmarkRecord;
use crate::config::{CONTEXT_MENU_ID, NOTIFICATION_ICON, NOTIFICATION_TITLE_LEN};
use crate::router::RawTab;
use crate::search::shorten_text;
use crate::storage::StorageBackend;
use crate::store::Store;

/// The fields of `chrome.contextMenus.OnClickData` we look at
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: serde_json::Value,
}

impl MenuClick {
    pub fn is_save_page(&self) -> bool {
        self.menu_item_id.as_str() == Some(CONTEXT_MENU_ID)
    }
}

/// Options for `chrome.notifications.create` with `type: "basic"`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon_url: &'static str,
    pub title: String,
    pub message: String,
    pub priority: i32,
}

impl Notification {
    fn basic(title: &str, message: String, priority: i32) -> Self {
        Notification {
            kind: "basic",
            icon_url: NOTIFICATION_ICON,
            title: title.to_string(),
            message,
            priority,
        }
    }
}

/// Save the clicked page and describe the outcome for the user.
///
/// Returns `None` for clicks on other menu items or when the browser gave us
/// no usable tab.
pub(crate) async fn save_clicked_page<B: StorageBackend>(
    store: &Store<B>,
    click: &MenuClick,
    tab: Option<RawTab>,
) -> Option<Notification> {
    if !click.is_save_page() {
        return None;
    }
    let tab = tab.and_then(RawTab::into_tab_info)?;

    let record = BookmarkRecord::new(tab.url, Some(&tab.title), Vec::new());
    let title = record.title.clone();

    let notification = match store.create(record).await {
        Ok(_) => Notification::basic(
            "Page Saved!",
            format!(
                "\"{}\" saved to OpenPocket.",
                shorten_text(&title, NOTIFICATION_TITLE_LEN)
            ),
            0,
        ),
        Err(e) => {
            log::error!("Error saving from context menu: {}", e);
            Notification::basic("Save Failed", format!("Could not save page. Error: {}", e), 1)
        }
    };

    Some(notification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn click(id: &str) -> MenuClick {
        MenuClick { menu_item_id: json!(id) }
    }

    fn tab(url: &str, title: Option<&str>) -> Option<RawTab> {
        Some(RawTab {
            url: Some(url.to_string()),
            title: title.map(String::from),
        })
    }

    #[tokio::test]
    async fn test_saves_page_with_empty_tags() {
        let store = Store::new(MemoryStorage::new());

        let notification = save_clicked_page(
            &store,
            &click("savePageToOpenPocket"),
            tab("https://www.rust-lang.org", Some("Rust")),
        )
        .await
        .unwrap();

        assert_eq!(notification.title, "Page Saved!");
        assert_eq!(notification.message, "\"Rust\" saved to OpenPocket.");
        assert_eq!(notification.priority, 0);

        let items = store.list_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.rust-lang.org");
        assert!(items[0].tags.is_empty());
    }

    #[tokio::test]
    async fn test_long_title_is_shortened() {
        let store = Store::new(MemoryStorage::new());
        let title = "A very long page title that keeps going and going";

        let notification = save_clicked_page(
            &store,
            &click("savePageToOpenPocket"),
            tab("https://example.com", Some(title)),
        )
        .await
        .unwrap();

        assert_eq!(
            notification.message,
            "\"A very long page title that keeps goi...\" saved to OpenPocket."
        );
    }

    #[tokio::test]
    async fn test_untitled_tab() {
        let store = Store::new(MemoryStorage::new());

        save_clicked_page(&store, &click("savePageToOpenPocket"), tab("https://example.com", None))
            .await
            .unwrap();

        assert_eq!(store.list_all().await.unwrap()[0].title, "Untitled Page");
    }

    #[tokio::test]
    async fn test_duplicate_reports_failure() {
        let store = Store::new(MemoryStorage::new());
        let menu = click("savePageToOpenPocket");
        save_clicked_page(&store, &menu, tab("https://example.com", Some("Example"))).await;

        let notification = save_clicked_page(&store, &menu, tab("https://example.com", Some("Example")))
            .await
            .unwrap();

        assert_eq!(notification.title, "Save Failed");
        assert_eq!(
            notification.message,
            "Could not save page. Error: This page is already saved."
        );
        assert_eq!(notification.priority, 1);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ignores_other_menu_items_and_missing_tab() {
        let store = Store::new(MemoryStorage::new());

        assert!(
            save_clicked_page(&store, &click("somethingElse"), tab("https://example.com", None))
                .await
                .is_none()
        );
        assert!(
            save_clicked_page(&store, &click("savePageToOpenPocket"), None)
                .await
                .is_none()
        );
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_notification_options_shape() {
        let notification = Notification::basic("Page Saved!", "done".to_string(), 0);
        assert_eq!(
            serde_json::to_value(&notification).unwrap(),
            json!({
                "type": "basic",
                "iconUrl": "icons/icon48.png",
                "title": "Page Saved!",
                "message": "done",
                "priority": 0
            })
        );
    }
}
