/// Popup UI: inactive tab suggestions with close buttons

use std::cell::Cell;
use std::rc::Rc;
use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::chrome::{current_window_id, send_request, ChromeStorage};
use crate::messages::{Request, Response};
use crate::settings::{Settings, SettingsStore};
use crate::tab_data::Suggestion;
use crate::ui::components::SuggestionItem;
use crate::ui::settings::SettingsForm;

pub const REFRESH_INTERVAL_MS: i32 = 30_000;

#[derive(Clone, PartialEq)]
enum AppState {
    Loading,
    Idle,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading);
    let suggestions = use_state(Vec::<Suggestion>::new);
    let window_id = use_state(|| None::<i32>);
    let settings = use_state(Settings::default);
    let show_settings = use_state(|| false);
    let generation = use_mut_ref(RequestGeneration::default);

    let refresh = {
        let state = state.clone();
        let suggestions = suggestions.clone();
        let generation = generation.clone();

        Callback::from(move |window: Option<i32>| {
            let state = state.clone();
            let suggestions = suggestions.clone();
            let generation = generation.clone();

            let issued = generation.borrow().issue();

            spawn_local(async move {
                let result = send_request(&Request::GetTabSuggestions { window_id: window }).await;
                if !generation.borrow().is_current(issued) {
                    log::debug!("Dropping stale suggestions response");
                    return;
                }

                match result {
                    Ok(Response::Suggestions { suggestions: list }) => {
                        suggestions.set(list);
                        state.set(AppState::Idle);
                    }
                    Ok(Response::Error { error }) => state.set(AppState::Error(error)),
                    Ok(other) => {
                        log::warn!("Unexpected response: {:?}", other);
                        state.set(AppState::Error("Failed to load tab suggestions".to_string()));
                    }
                    Err(e) => {
                        log::error!("Failed to load tab suggestions: {}", e);
                        state.set(AppState::Error("Failed to load tab suggestions".to_string()));
                    }
                }
            });
        })
    };

    // Load settings and the current window on mount
    {
        let state = state.clone();
        let window_id = window_id.clone();
        let settings = settings.clone();
        let refresh = refresh.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                load_settings(settings).await;
                match current_window_id().await {
                    Ok(Some(id)) => {
                        window_id.set(Some(id));
                        refresh.emit(Some(id));
                    }
                    Ok(None) => state.set(AppState::Error("Could not get window ID".to_string())),
                    Err(e) => {
                        log::error!("Failed to get current window: {}", e);
                        state.set(AppState::Error("Failed to get current window".to_string()));
                    }
                }
            });
            || ()
        });
    }

    // Periodic refresh while the list is shown
    {
        let refresh = refresh.clone();

        use_effect_with((*window_id, *show_settings), move |(window, showing_settings)| {
            let window = *window;
            let timer = if window.is_some() && !*showing_settings {
                start_refresh_timer(move || refresh.emit(window))
            } else {
                None
            };
            move || {
                if let Some(timer) = timer {
                    timer.cancel();
                }
            }
        });
    }

    let on_close_tab = {
        let state = state.clone();
        let suggestions = suggestions.clone();
        let generation = generation.clone();

        Callback::from(move |tab_id: i32| {
            let state = state.clone();
            let suggestions = suggestions.clone();
            // A list fetched before the close could still contain this tab
            generation.borrow().issue();

            spawn_local(async move {
                match send_request(&Request::CloseTab { tab_id }).await {
                    Ok(Response::Error { error }) => state.set(AppState::Error(error)),
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("Failed to close tab {}: {}", tab_id, e);
                        state.set(AppState::Error("Failed to close tab".to_string()));
                    }
                }
                // Drop the row either way: the background forgot the tab
                let remaining: Vec<Suggestion> = suggestions
                    .iter()
                    .filter(|s| s.tab_id != tab_id)
                    .cloned()
                    .collect();
                suggestions.set(remaining);
            });
        })
    };

    let on_open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(true))
    };

    let on_settings_saved = {
        let settings = settings.clone();
        let show_settings = show_settings.clone();
        let state = state.clone();
        let window_id = window_id.clone();
        let refresh = refresh.clone();

        Callback::from(move |saved: Settings| {
            settings.set(saved);
            show_settings.set(false);
            state.set(AppState::Loading);
            refresh.emit(*window_id);
        })
    };

    let on_settings_cancel = {
        let show_settings = show_settings.clone();
        let window_id = window_id.clone();
        let refresh = refresh.clone();

        Callback::from(move |_| {
            show_settings.set(false);
            refresh.emit(*window_id);
        })
    };

    let body = if *show_settings {
        html! {
            <SettingsForm
                current={*settings}
                on_saved={on_settings_saved}
                on_cancel={on_settings_cancel}
            />
        }
    } else {
        match &*state {
            AppState::Loading => html! {
                <div class="loading-text-center">
                    <Spinner />
                    <p class="loading-text">{"Loading tab suggestions..."}</p>
                </div>
            },
            AppState::Error(err) => html! {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err.clone()}
                </Alert>
            },
            AppState::Idle if suggestions.is_empty() => html! {
                <div class="empty-state">
                    {"No inactive tab suggestions at the moment. Your tabs are well-managed!"}
                </div>
            },
            AppState::Idle => html! {
                <div class="tab-list">
                    {for suggestions.iter().map(|suggestion| html! {
                        <SuggestionItem
                            key={suggestion.tab_id}
                            suggestion={suggestion.clone()}
                            inactive_minutes={settings.inactive_minutes}
                            on_close={on_close_tab.clone()}
                        />
                    })}
                </div>
            },
        }
    };

    html! {
        <div class="padding-20">
            <div class="popup-header">
                <h1 class="popup-title">{"Inactive"}</h1>
                <Button onclick={on_open_settings} variant={ButtonVariant::Plain}>
                    {"⚙️"}
                </Button>
            </div>
            {body}
            <p class="footer-popup">
                {"Tab Idler v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

/// Numbers popup requests so only the latest one may update the list
#[derive(Default)]
struct RequestGeneration(Cell<u64>);

impl RequestGeneration {
    fn issue(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    fn is_current(&self, issued: u64) -> bool {
        self.0.get() == issued
    }
}

async fn load_settings(settings: UseStateHandle<Settings>) {
    let store = SettingsStore::new(Rc::new(ChromeStorage::sync()));
    match store.load().await {
        Ok(loaded) => settings.set(loaded),
        Err(e) => log::warn!("Using default settings: {}", e),
    }
}

/// A `setInterval` timer; the callback lives as long as the timer
struct RefreshTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl RefreshTimer {
    fn cancel(self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

fn start_refresh_timer(tick: impl FnMut() + 'static) -> Option<RefreshTimer> {
    let callback = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
    let handle = web_sys::window()?
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            REFRESH_INTERVAL_MS,
        )
        .map_err(|e| log::warn!("Failed to start refresh timer: {:?}", e))
        .ok()?;

    Some(RefreshTimer {
        handle,
        _callback: callback,
    })
}
