//! Best-effort bridge to the embedding Telegram Mini App object.
//!
//! Everything here degrades to a no-op or a fixed fallback when the game runs
//! in a plain browser tab, so no caller has to care whether Telegram exists.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub const ANONYMOUS: &str = "Anonymous";

/// `window.Telegram.WebApp`, when present.
fn web_app() -> Option<JsValue> {
    let window = web_sys::window()?;
    get_path(window.as_ref(), &["Telegram", "WebApp"])
}

/// Walk a property path, bailing out at the first null/undefined link.
fn get_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for segment in path {
        current = js_sys::Reflect::get(&current, &(*segment).into()).ok()?;
        if current.is_null() || current.is_undefined() {
            return None;
        }
    }
    Some(current)
}

/// Call a no-argument method on `target`, swallowing every failure.
fn invoke0(target: &JsValue, name: &str) {
    if let Some(f) = get_path(target, &[name]) {
        if let Ok(f) = f.dyn_into::<js_sys::Function>() {
            f.call0(target).ok();
        }
    }
}

/// Startup handshake: tell Telegram the app is ready, expand the viewport and
/// hide the main button.
pub fn init() {
    let Some(app) = web_app() else {
        return;
    };
    invoke0(&app, "ready");
    invoke0(&app, "expand");
    if let Some(button) = get_path(&app, &["MainButton"]) {
        invoke0(&button, "hide");
    }
}

/// Display name of the current user, falling back to a fixed placeholder.
pub fn display_name() -> String {
    web_app()
        .and_then(|app| get_path(&app, &["initDataUnsafe", "user", "first_name"]))
        .and_then(|v| v.as_string())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Light haptic tap for a counted shake.
pub fn haptic_impact() {
    let Some(haptics) = web_app().and_then(|app| get_path(&app, &["HapticFeedback"])) else {
        return;
    };
    if let Some(f) = get_path(&haptics, &["impactOccurred"]) {
        if let Ok(f) = f.dyn_into::<js_sys::Function>() {
            f.call1(&haptics, &JsValue::from_str("light")).ok();
        }
    }
}
