/// Popup UI for the OpenPocket extension

use std::cell::RefCell;
use std::rc::Rc;

use patternfly_yew::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::bookmark::{BookmarkRecord, SavePageData, TabInfo, is_valid_page_url, parse_tags, title_or_placeholder};
use crate::config::{MESSAGE_DURATION_MS, POPUP_TITLE_LEN};
use crate::error::js_error_message;
use crate::router::{Request, Response, ResponseData};
use crate::search::{filter_records, shorten_text};
use crate::ui::components::BookmarkCard;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(request: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Clone, Copy, PartialEq)]
enum MessageKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq)]
struct PopupMessage {
    id: u32,
    text: String,
    kind: MessageKind,
}

#[derive(Default, PartialEq)]
struct MessageState {
    current: Option<PopupMessage>,
}

enum MessageAction {
    Show(PopupMessage),
    Dismiss(u32),
}

impl Reducible for MessageState {
    type Action = MessageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            MessageAction::Show(message) => Rc::new(MessageState {
                current: Some(message),
            }),
            // Only clear the message the timer was started for
            MessageAction::Dismiss(id) => match &self.current {
                Some(current) if current.id == id => Rc::new(MessageState::default()),
                _ => self,
            },
        }
    }
}

/// Shows a transient message and schedules its removal
#[derive(Clone)]
struct Messenger {
    dispatcher: UseReducerDispatcher<MessageState>,
    counter: Rc<RefCell<u32>>,
}

impl Messenger {
    fn show(&self, text: impl Into<String>, kind: MessageKind) {
        let id = {
            let mut counter = self.counter.borrow_mut();
            *counter += 1;
            *counter
        };

        self.dispatcher.dispatch(MessageAction::Show(PopupMessage {
            id,
            text: text.into(),
            kind,
        }));

        let dispatcher = self.dispatcher.clone();
        let dismiss = Closure::once_into_js(move || {
            dispatcher.dispatch(MessageAction::Dismiss(id));
        });
        if let Some(window) = web_sys::window() {
            let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                dismiss.unchecked_ref(),
                MESSAGE_DURATION_MS,
            );
            if let Err(e) = scheduled {
                log::warn!("Could not schedule message dismissal: {}", js_error_message(&e));
            }
        }
    }

    fn success(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Success);
    }

    fn error(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Error);
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let url_value = use_state(String::new);
    let title_value = use_state(String::new);
    let tags_value = use_state(String::new);
    let search_query = use_state(String::new);
    let all_items = use_state(Vec::<BookmarkRecord>::new);
    let tab_failed = use_state(|| false);
    let saving = use_state(|| false);
    let items_failed = use_state(|| false);
    let messages = use_reducer(MessageState::default);
    let counter = use_mut_ref(|| 0u32);

    let messenger = Messenger {
        dispatcher: messages.dispatcher(),
        counter,
    };

    // Reload the saved items list
    let load_items = {
        let all_items = all_items.clone();
        let items_failed = items_failed.clone();
        let messenger = messenger.clone();

        Callback::from(move |_: ()| {
            let all_items = all_items.clone();
            let items_failed = items_failed.clone();
            let messenger = messenger.clone();

            spawn_local(async move {
                match fetch_items().await {
                    Ok(items) => {
                        items_failed.set(false);
                        all_items.set(items);
                    }
                    Err(e) => {
                        log::error!("Error loading items: {}", e);
                        items_failed.set(true);
                        messenger.error("Could not load saved items.");
                    }
                }
            });
        })
    };

    // Load current tab info and saved items on mount
    {
        let url_value = url_value.clone();
        let title_value = title_value.clone();
        let tab_failed = tab_failed.clone();
        let messenger = messenger.clone();
        let load_items = load_items.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_current_tab().await {
                    Ok(tab) => {
                        url_value.set(tab.url);
                        title_value.set(tab.title);
                    }
                    Err(e) => {
                        log::error!("Error getting tab info: {}", e);
                        messenger.error("Could not load current page details.");
                        url_value.set("Error loading URL".to_string());
                        title_value.set("Error loading Title".to_string());
                        tab_failed.set(true);
                    }
                }
            });
            load_items.emit(());
            || ()
        });
    }

    let on_url_input = input_setter(&url_value);
    let on_title_input = input_setter(&title_value);
    let on_tags_input = input_setter(&tags_value);
    let on_search_input = input_setter(&search_query);

    // Save handler
    let on_save = {
        let url_value = url_value.clone();
        let title_value = title_value.clone();
        let tags_value = tags_value.clone();
        let saving = saving.clone();
        let messenger = messenger.clone();
        let load_items = load_items.clone();

        Callback::from(move |_: MouseEvent| {
            let url = url_value.trim().to_string();
            if !is_valid_page_url(&url) {
                messenger.error("Please provide a valid URL.");
                return;
            }

            let title = title_or_placeholder(Some(title_value.as_str()));
            let data = SavePageData {
                url,
                title: Some(title.clone()),
                tags: parse_tags(&tags_value),
                ..SavePageData::default()
            };

            let tags_value = tags_value.clone();
            let saving = saving.clone();
            let messenger = messenger.clone();
            let load_items = load_items.clone();

            saving.set(true);
            spawn_local(async move {
                let result = send_request(&Request::SavePage { data }).await;
                saving.set(false);

                match result {
                    Ok(response) if response.success => {
                        messenger.success(format!(
                            "\"{}\" saved successfully!",
                            shorten_text(&title, POPUP_TITLE_LEN)
                        ));
                        tags_value.set(String::new());
                        load_items.emit(());
                    }
                    Ok(response) => messenger.error(response.error_or("Failed to save page.")),
                    Err(e) => {
                        log::error!("Save request failed: {}", e);
                        messenger.error("Failed to save page.");
                    }
                }
            });
        })
    };

    // Delete handler
    let on_delete = {
        let messenger = messenger.clone();
        let load_items = load_items.clone();

        Callback::from(move |item_id: String| {
            let messenger = messenger.clone();
            let load_items = load_items.clone();

            spawn_local(async move {
                match send_request(&Request::DeleteItem { item_id }).await {
                    Ok(response) if response.success => {
                        messenger.success("Item deleted successfully.");
                        load_items.emit(());
                    }
                    Ok(response) => messenger.error(response.error_or("Failed to delete item.")),
                    Err(e) => {
                        log::error!("Delete request failed: {}", e);
                        messenger.error("Failed to delete item.");
                    }
                }
            });
        })
    };

    let visible_items = filter_records(&all_items, &search_query);
    let save_disabled = *tab_failed || *saving;

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"OpenPocket"}</h1>

            // Transient messages
            if let Some(message) = messages.current.clone() {
                <div class="message-container">
                    <Alert
                        r#type={if message.kind == MessageKind::Success { AlertType::Success } else { AlertType::Danger }}
                        title={message.text}
                        inline={true}
                    >
                    </Alert>
                </div>
            }

            // Save form
            <div class="flex-column-gap">
                <input
                    id="page-url"
                    type="text"
                    placeholder="URL"
                    value={(*url_value).clone()}
                    oninput={on_url_input}
                    class="form-input"
                />
                <input
                    id="page-title"
                    type="text"
                    placeholder="Title"
                    value={(*title_value).clone()}
                    oninput={on_title_input}
                    class="form-input"
                />
                <input
                    id="page-tags"
                    type="text"
                    placeholder="Tags (comma separated)"
                    value={(*tags_value).clone()}
                    oninput={on_tags_input}
                    class="form-input"
                />
                <Button onclick={on_save} disabled={save_disabled} variant={ButtonVariant::Primary} block={true}>
                    {if *saving { "Saving..." } else { "Save Page" }}
                </Button>
            </div>

            // Search bar
            <div class="search-container">
                <input
                    id="search-input"
                    type="text"
                    placeholder="Search saved pages..."
                    value={(*search_query).clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
            </div>

            // Saved items
            if visible_items.is_empty() || *items_failed {
                <p class="empty-state">{"No saved items yet."}</p>
            } else {
                <ul class="saved-items-list">
                    {for visible_items.into_iter().map(|record| html! {
                        <BookmarkCard
                            key={record.id.clone()}
                            record={record.clone()}
                            on_delete={on_delete.clone()}
                        />
                    })}
                </ul>
            }

            <p class="footer-popup">
                {"OpenPocket v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn input_setter(handle: &UseStateHandle<String>) -> Callback<InputEvent> {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            handle.set(input.value());
        }
    })
}

async fn send_request(request: &Request) -> Result<Response, String> {
    let request_js = request
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize request: {:?}", e))?;

    let response_js = sendMessage(request_js)
        .await
        .map_err(|e| js_error_message(&e))?;

    if response_js.is_null() || response_js.is_undefined() {
        return Err("No response".to_string());
    }

    serde_wasm_bindgen::from_value(response_js)
        .map_err(|e| format!("Failed to parse response: {:?}", e))
}

async fn fetch_items() -> Result<Vec<BookmarkRecord>, String> {
    let response = send_request(&Request::GetItems).await?;
    if !response.success {
        return Err(response.error_or("No response"));
    }
    match response.data {
        Some(ResponseData::Records(items)) => Ok(items),
        _ => Err("No items in response".to_string()),
    }
}

async fn fetch_current_tab() -> Result<TabInfo, String> {
    let response = send_request(&Request::GetCurrentTabInfo).await?;
    if !response.success {
        return Err(response.error_or("No response"));
    }
    match response.data {
        Some(ResponseData::Tab(tab)) => Ok(tab),
        _ => Err("No tab in response".to_string()),
    }
}
