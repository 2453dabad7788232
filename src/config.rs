/// Extension-wide constants

/// `chrome.storage.local` slot holding the whole collection
pub const STORAGE_KEY: &str = "savedItems";

/// Title used whenever a page has none
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Context menu registration
pub const CONTEXT_MENU_ID: &str = "savePageToOpenPocket";
pub const CONTEXT_MENU_TITLE: &str = "Save to OpenPocket";

pub const NOTIFICATION_ICON: &str = "icons/icon48.png";

/// Maximum lengths used when shortening titles and URLs for display
pub const NOTIFICATION_TITLE_LEN: usize = 40;
pub const POPUP_TITLE_LEN: usize = 30;
pub const POPUP_URL_LEN: usize = 40;

/// How long popup messages stay visible
pub const MESSAGE_DURATION_MS: i32 = 3000;
