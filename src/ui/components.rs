/// Reusable UI components

use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::bookmark::BookmarkRecord;
use crate::config::POPUP_URL_LEN;
use crate::search::shorten_url;

#[derive(Properties, PartialEq)]
pub struct TagListProps {
    pub tags: Vec<String>,
}

#[function_component(TagList)]
pub fn tag_list(props: &TagListProps) -> Html {
    if props.tags.is_empty() {
        return html! {
            <div class="tag-list">
                <span class="no-tags">{"No tags"}</span>
            </div>
        };
    }

    html! {
        <div class="tag-list">
            {for props.tags.iter().map(|tag| html! {
                <span class="tag">{tag}</span>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BookmarkCardProps {
    pub record: BookmarkRecord,
    pub on_delete: Callback<String>,
}

#[function_component(BookmarkCard)]
pub fn bookmark_card(props: &BookmarkCardProps) -> Html {
    let record = &props.record;

    let title = if record.title.is_empty() {
        "Untitled".to_string()
    } else {
        record.title.clone()
    };

    let on_delete = props.on_delete.reform({
        let id = record.id.clone();
        move |_: MouseEvent| id.clone()
    });

    html! {
        <li class="saved-item-card">
            <h3 class="saved-item-title">
                <a href={record.url.clone()} target="_blank" rel="noopener noreferrer">
                    {title}
                </a>
            </h3>
            <p class="saved-item-url">{shorten_url(&record.url, POPUP_URL_LEN)}</p>
            <TagList tags={record.tags.clone()} />
            <div class="saved-item-controls">
                <p class="saved-item-date">
                    {format!("Added: {}", format_added_date(&record.date_added))}
                </p>
                <button class="delete-button" title="Delete Item" onclick={on_delete}>
                    {"🗑️"}
                </button>
            </div>
        </li>
    }
}

/// Local date for an ISO-8601 timestamp, e.g. "3/14/2024"
fn format_added_date(iso: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    if date.get_time().is_nan() {
        return iso.to_string();
    }
    String::from(date.to_locale_date_string("default", &JsValue::UNDEFINED))
}
