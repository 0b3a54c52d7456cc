use crate::error::GenAiError;
use crate::wire::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const CHAT_MODEL: &str = "gemini-3-pro-preview";
pub const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const FAST_MODEL: &str = "gemini-flash-lite-latest";

/// Boxed future without a `Send` bound; browser futures are single-threaded.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Raw HTTP response as seen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON POST. Implementations report only transport failures as
/// errors; HTTP error statuses come back as a normal response.
pub trait Transport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: String,
    ) -> LocalBoxFuture<'a, Result<HttpResponse, GenAiError>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: String,
    ) -> LocalBoxFuture<'a, Result<HttpResponse, GenAiError>> {
        (**self).post_json(url, api_key, body)
    }
}

pub struct GenAiClient<T> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl<T: Transport> GenAiClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        if self.api_key.is_empty() {
            return Err(GenAiError::MissingApiKey);
        }
        let body = serde_json::to_string(request).map_err(|e| GenAiError::Encode(e.to_string()))?;
        let url = self.endpoint(model);
        tracing::debug!(model, bytes = body.len(), "generateContent");

        let resp = self.transport.post_json(&url, &self.api_key, body).await?;
        if !(200..300).contains(&resp.status) {
            let message = serde_json::from_str::<ApiErrorBody>(&resp.body)
                .map(|e| e.error.message)
                .unwrap_or(resp.body);
            return Err(GenAiError::Api {
                status: resp.status,
                message,
            });
        }
        serde_json::from_str(&resp.body).map_err(|e| GenAiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{HttpResponse, LocalBoxFuture, Transport};
    use crate::error::GenAiError;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Sent {
        pub url: String,
        pub api_key: String,
        pub body: serde_json::Value,
    }

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct FakeTransport {
        pub replies: RefCell<VecDeque<Result<HttpResponse, GenAiError>>>,
        pub sent: RefCell<Vec<Sent>>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: serde_json::Value) -> Self {
            let fake = Self::default();
            fake.push(status, body);
            fake
        }

        pub fn failing(err: GenAiError) -> Self {
            let fake = Self::default();
            fake.replies.borrow_mut().push_back(Err(err));
            fake
        }

        pub fn push(&self, status: u16, body: serde_json::Value) {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
        }

        pub fn last_body(&self) -> serde_json::Value {
            self.sent
                .borrow()
                .last()
                .map(|s| s.body.clone())
                .unwrap_or_default()
        }
    }

    impl Transport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            api_key: &'a str,
            body: String,
        ) -> LocalBoxFuture<'a, Result<HttpResponse, GenAiError>> {
            self.sent.borrow_mut().push(Sent {
                url: url.to_string(),
                api_key: api_key.to_string(),
                body: serde_json::from_str(&body).unwrap(),
            });
            let reply = self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(GenAiError::Transport("no reply queued".into())));
            Box::pin(async move { reply })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::{CHAT_MODEL, GenAiClient};
    use crate::error::GenAiError;
    use crate::wire::GenerateContentRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn posts_to_model_endpoint_with_key() {
        let fake = FakeTransport::replying(200, json!({"candidates": []}));
        let client = GenAiClient::new(&fake, "k-123");
        let resp = pollster::block_on(client.generate(CHAT_MODEL, &GenerateContentRequest::from_text("hi")));
        assert!(resp.is_ok());

        let sent = fake.sent.borrow();
        assert_eq!(
            sent[0].url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
        );
        assert_eq!(sent[0].api_key, "k-123");
    }

    #[test]
    fn error_status_surfaces_provider_message() {
        let fake = FakeTransport::replying(
            429,
            json!({"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}),
        );
        let client = GenAiClient::new(&fake, "k");
        let err = pollster::block_on(client.generate(CHAT_MODEL, &GenerateContentRequest::from_text("hi")))
            .unwrap_err();
        assert_eq!(
            err,
            GenAiError::Api {
                status: 429,
                message: "quota exceeded".into()
            }
        );
    }

    #[test]
    fn missing_key_short_circuits() {
        let fake = FakeTransport::default();
        let client = GenAiClient::new(&fake, "");
        let err = pollster::block_on(client.generate(CHAT_MODEL, &GenerateContentRequest::from_text("hi")))
            .unwrap_err();
        assert_eq!(err, GenAiError::MissingApiKey);
        assert!(fake.sent.borrow().is_empty());
    }

    #[test]
    fn base_url_override_trims_slash() {
        let fake = FakeTransport::default();
        let client = GenAiClient::new(&fake, "k").with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            client.endpoint("m"),
            "http://localhost:9000/v1/models/m:generateContent"
        );
    }
}
