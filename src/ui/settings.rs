/// Settings form shown inside the popup

use std::rc::Rc;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::chrome::ChromeStorage;
use crate::settings::{Settings, SettingsStore};

#[derive(Properties, PartialEq)]
pub struct SettingsFormProps {
    pub current: Settings,
    pub on_saved: Callback<Settings>,
    pub on_cancel: Callback<()>,
}

/// Parse the minutes field; anything below 1 is rejected
pub fn parse_minutes(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|minutes| *minutes >= 1)
}

#[function_component(SettingsForm)]
pub fn settings_form(props: &SettingsFormProps) -> Html {
    let input = use_state(|| props.current.inactive_minutes.to_string());
    let status = use_state(|| None::<Result<String, String>>);

    let on_input = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(field) = e.target_dyn_into::<HtmlInputElement>() {
                input.set(field.value());
            }
        })
    };

    let on_save = {
        let input = input.clone();
        let status = status.clone();
        let on_saved = props.on_saved.clone();

        Callback::from(move |_| {
            let Some(inactive_minutes) = parse_minutes(&input) else {
                status.set(Some(Err("Enter a whole number of minutes (1 or more)".to_string())));
                return;
            };

            let status = status.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                let store = SettingsStore::new(Rc::new(ChromeStorage::sync()));
                let settings = Settings { inactive_minutes };
                match store.save(settings).await {
                    Ok(()) => {
                        status.set(Some(Ok("Settings saved!".to_string())));
                        on_saved.emit(settings);
                    }
                    Err(e) => {
                        log::error!("Failed to save settings: {}", e);
                        status.set(Some(Err(format!("Failed to save: {}", e))));
                    }
                }
            });
        })
    };

    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_| on_cancel.emit(()))
    };

    html! {
        <div class="settings-form">
            <h3 class="settings-title">{"Settings"}</h3>
            <label class="settings-field">
                {"Inactive tab interval (minutes):"}
                <input
                    type="number"
                    min="1"
                    value={(*input).clone()}
                    oninput={on_input}
                    class="settings-input"
                />
            </label>
            <div class="settings-actions">
                <Button onclick={on_save} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>
                <Button onclick={on_cancel} variant={ButtonVariant::Secondary}>
                    {"Cancel"}
                </Button>
            </div>
            {match &*status {
                Some(Ok(msg)) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true} />
                },
                Some(Err(err)) => html! {
                    <Alert r#type={AlertType::Danger} title={err.clone()} inline={true} />
                },
                None => html! {},
            }}
        </div>
    }
}
