use genai::{GenAiError, HttpResponse, LocalBoxFuture, Transport};
use gloo_net::http::Request;

/// `fetch`-backed transport for the provider client.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: String,
    ) -> LocalBoxFuture<'a, Result<HttpResponse, GenAiError>> {
        Box::pin(async move {
            let resp = Request::post(url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", api_key)
                .body(body)
                .map_err(|e| GenAiError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| GenAiError::Transport(e.to_string()))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| GenAiError::Transport(e.to_string()))?;
            Ok(HttpResponse { status, body })
        })
    }
}
