//! End-of-session flavor text from a remote generation endpoint.
//!
//! One POST per finished session, raced against a timeout. Every failure mode
//! (missing key, network error, non-2xx, timeout, unparsable body, empty text)
//! collapses to a fixed string; the caller never sees an error.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use super::modes::GameMode;

const ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent";

/// Host page global holding the API key. Absent key means instant fallback.
const API_KEY_GLOBAL: &str = "SHAKE_MASTER_API_KEY";

const REQUEST_TIMEOUT_MS: i32 = 8_000;

/// Shown when the request itself fails (network, HTTP error, timeout).
pub const FALLBACK_ON_ERROR: &str = "Ты настоящий зверь!";

/// Shown when the endpoint answers but produces no usable text.
pub const FALLBACK_ON_EMPTY: &str = "Отличная работа, Мастер Тряски!";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_prompt(score: u64, mode: GameMode) -> String {
    format!(
        "The user just finished a shaking session in {} mode and scored {} points. \
         Generate a short (max 10 words), funny, and slightly competitive motivational \
         message in Russian for a Telegram Mini App. The theme is \"Shake Master\". \
         Be energetic!",
        mode.label(),
        score
    )
}

/// Pull the first candidate's text out of a raw response body. `None` for
/// unparsable bodies and for answers that are present but blank.
fn extract_text(body: &str) -> Option<String> {
    let parsed: GenerateResponse = serde_json::from_str(body).ok()?;
    let text = parsed
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn api_key() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(window.as_ref(), &API_KEY_GLOBAL.into())
        .ok()?
        .as_string()
        .filter(|key| !key.is_empty())
}

/// A promise that rejects after `ms`, for racing against fetch.
fn timeout_promise(ms: i32) -> js_sys::Promise {
    js_sys::Promise::new(&mut |_resolve, reject| {
        let reject_cb = reject.clone();
        let cb = Closure::once(move || {
            reject_cb
                .call1(&JsValue::NULL, &JsValue::from_str("timed out"))
                .ok();
        });
        let armed = web_sys::window().is_some_and(|win| {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms,
            )
            .is_ok()
        });
        if armed {
            cb.forget();
        } else {
            reject
                .call1(&JsValue::NULL, &JsValue::from_str("no timer available"))
                .ok();
        }
    })
}

async fn request_text(prompt: &str, key: &str) -> Result<String, JsValue> {
    let payload = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig { temperature: 0.8 },
    };
    let body =
        serde_json::to_string(&payload).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let url = format!("{ENDPOINT}?key={key}");
    let request = Request::new_with_str_and_init(&url, &init)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let raced = js_sys::Promise::race(
        &js_sys::Array::of2(
            &window.fetch_with_request(&request).into(),
            &timeout_promise(REQUEST_TIMEOUT_MS).into(),
        )
        .into(),
    );
    let response: Response = JsFuture::from(raced).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("http {}", response.status())));
    }
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("non-string body"))
}

/// Fetch the flavor message for a finished session. Infallible by contract.
pub async fn generate(score: u64, mode: GameMode) -> String {
    let Some(key) = api_key() else {
        web_sys::console::warn_1(&"flavor: no API key configured, using fallback".into());
        return FALLBACK_ON_ERROR.to_string();
    };
    let prompt = build_prompt(score, mode);
    match request_text(&prompt, &key).await {
        Ok(body) => extract_text(&body).unwrap_or_else(|| {
            web_sys::console::warn_1(&"flavor: empty generation, using default".into());
            FALLBACK_ON_EMPTY.to_string()
        }),
        Err(err) => {
            web_sys::console::warn_1(&err);
            FALLBACK_ON_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_reads_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Жми сильнее!"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body).as_deref(), Some("Жми сильнее!"));
    }

    #[test]
    fn extract_text_trims_whitespace() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Вперёд!  "}]}}]}"#;
        assert_eq!(extract_text(body).as_deref(), Some("Вперёд!"));
    }

    #[test]
    fn extract_text_rejects_blank_and_missing_answers() {
        assert_eq!(extract_text(r#"{"candidates":[]}"#), None);
        assert_eq!(extract_text(r#"{}"#), None);
        assert_eq!(
            extract_text(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#),
            None
        );
        assert_eq!(
            extract_text(r#"{"candidates":[{"content":{"parts":[]}}]}"#),
            None
        );
        assert_eq!(extract_text("not json at all"), None);
    }

    #[test]
    fn prompt_mentions_mode_and_score() {
        let prompt = build_prompt(420, GameMode::ThreeMin);
        assert!(prompt.contains("3m"));
        assert!(prompt.contains("420"));
    }

    #[test]
    fn fallbacks_are_distinct_fixed_strings() {
        assert_ne!(FALLBACK_ON_ERROR, FALLBACK_ON_EMPTY);
        assert!(!FALLBACK_ON_ERROR.is_empty());
        assert!(!FALLBACK_ON_EMPTY.is_empty());
    }
}
