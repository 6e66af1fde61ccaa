use helpdesk_core::effect::Confirm;
use helpdesk_core::storage::KeyValueStore;
use helpdesk_core::ClientError;
use wasm_bindgen::JsValue;

fn window() -> Result<web_sys::Window, ClientError> {
    web_sys::window().ok_or_else(|| ClientError::Storage("window not available".into()))
}

fn js_err(context: &str) -> impl Fn(JsValue) -> ClientError + '_ {
    move |e| ClientError::Storage(format!("{context}: {e:?}"))
}

/// `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, ClientError> {
        window()?
            .local_storage()
            .map_err(js_err("localStorage"))?
            .ok_or_else(|| ClientError::Storage("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Self::storage()?.get_item(key).map_err(js_err("getItem"))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        Self::storage()?.set_item(key, value).map_err(js_err("setItem"))
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        Self::storage()?.remove_item(key).map_err(js_err("removeItem"))
    }
}

/// `window.confirm`. A blocked dialog counts as "no".
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        window()
            .ok()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

pub fn current_path() -> String {
    window()
        .ok()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".into())
}

/// Put `path` in the address bar. `replace` is used for redirects so the
/// back button skips the page that bounced.
pub fn set_path(path: &str, replace: bool) {
    let Ok(history) = window().and_then(|w| w.history().map_err(js_err("history"))) else {
        return;
    };
    let result = if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        leptos::logging::warn!("history update failed: {e:?}");
    }
}
