/// Client-side filtering and display shortening for saved pages

use url::Url;

use crate::bookmark::BookmarkRecord;

/// Records whose title, URL or any tag contains `query`, ignoring case.
///
/// A blank query matches everything. Order is preserved.
pub fn filter_records<'a>(records: &'a [BookmarkRecord], query: &str) -> Vec<&'a BookmarkRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            record.title.to_lowercase().contains(&query)
                || record.url.to_lowercase().contains(&query)
                || record.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
        })
        .collect()
}

/// Truncate to `max_len` characters, ending in "..." when cut
pub fn shorten_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Compact form of a URL for list display.
///
/// Long URLs collapse to their host, with "/..." marking a dropped path.
/// If even that is too long, the host is cut to `max_len - 3` characters and
/// always ends in "...". Anything that does not parse is cut like plain text.
pub fn shorten_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }

    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let suffix = if parsed.path().len() > 1 { "/..." } else { "" };
            let short = format!("{}{}", host, suffix);

            if short.chars().count() > max_len {
                let kept: String = host.chars().take(max_len.saturating_sub(3)).collect();
                format!("{}...", kept)
            } else {
                short
            }
        }
        Err(_) => shorten_text(url, max_len),
    }
}
