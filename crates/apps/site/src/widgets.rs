//! Chat and image-lab bindings. Each call builds a client from the key
//! stored at boot; the chat conversation lives for the page.

use crate::http::FetchTransport;
use genai::{ChatSession, GenAiClient, ImageSize, Turn};
use js_sys::Promise;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub const IMAGE_FAILED_ALERT: &str = "Failed to generate image. Please try again.";

thread_local! {
    static API_KEY: RefCell<String> = const { RefCell::new(String::new()) };
    static CHAT: RefCell<ChatSession> = RefCell::new(ChatSession::new());
}

pub fn set_api_key(key: String) {
    API_KEY.with(|k| *k.borrow_mut() = key);
}

fn client() -> GenAiClient<FetchTransport> {
    GenAiClient::new(FetchTransport, API_KEY.with(|k| k.borrow().clone()))
}

fn turns_json(turns: &[Turn]) -> Result<JsValue, JsValue> {
    serde_json::to_string(turns)
        .map(|s| JsValue::from_str(&s))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Conversation so far as a JSON array of `{role, text}`.
#[wasm_bindgen]
pub fn chat_history() -> Result<JsValue, JsValue> {
    CHAT.with(|c| turns_json(c.borrow().history().turns()))
}

/// Sends `text` and resolves to the assistant reply. Resolves to `null` when
/// the input is blank or a reply is still pending; never rejects on provider
/// failure.
#[wasm_bindgen]
pub fn chat_send(text: String) -> Promise {
    future_to_promise(async move {
        let Some((prior, message)) = CHAT.with(|c| c.borrow_mut().begin(&text)) else {
            return Ok(JsValue::NULL);
        };
        let reply = genai::send_message(&client(), &prior, &message).await;
        CHAT.with(|c| c.borrow_mut().finish(reply.clone()));
        Ok(JsValue::from_str(&reply))
    })
}

/// Resolves to a `data:` URI, or `null` when no image came back. Failures
/// raise a blocking alert and also resolve to `null`.
#[wasm_bindgen]
pub fn image_generate(prompt: String, size: String) -> Promise {
    future_to_promise(async move {
        if prompt.trim().is_empty() {
            return Ok(JsValue::NULL);
        }
        let size = size.parse::<ImageSize>().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default image size");
            ImageSize::default()
        });
        match genai::generate_image(&client(), &prompt, size).await {
            Ok(Some(uri)) => Ok(JsValue::from_str(&uri)),
            Ok(None) => Ok(JsValue::NULL),
            Err(_) => {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(IMAGE_FAILED_ALERT);
                }
                Ok(JsValue::NULL)
            }
        }
    })
}

/// Resolves to the rewritten prompt, or to the original when enhancement
/// produced nothing.
#[wasm_bindgen]
pub fn image_enhance_prompt(prompt: String) -> Promise {
    future_to_promise(async move {
        let enhanced = genai::enhance_prompt(&client(), &prompt).await;
        Ok(JsValue::from_str(enhanced.as_deref().unwrap_or(&prompt)))
    })
}
