use crate::client::{FAST_MODEL, GenAiClient, Transport};
use crate::wire::GenerateContentRequest;

/// Single-prompt, history-free generation on the fast model. Any failure
/// yields an empty string.
pub async fn fast_generate<T: Transport>(client: &GenAiClient<T>, prompt: &str) -> String {
    match client
        .generate(FAST_MODEL, &GenerateContentRequest::from_text(prompt))
        .await
    {
        Ok(resp) => resp.text(),
        Err(err) => {
            tracing::warn!(%err, "fast generation failed");
            String::new()
        }
    }
}

pub fn enhancement_prompt(prompt: &str) -> String {
    format!(
        "Rewrite this image prompt to be more descriptive and artistic for a high-end AI image generator. Keep it under 50 words. Prompt: \"{prompt}\""
    )
}

/// Rewrites an image prompt into a richer one. `None` means keep the
/// original.
pub async fn enhance_prompt<T: Transport>(client: &GenAiClient<T>, prompt: &str) -> Option<String> {
    if prompt.trim().is_empty() {
        return None;
    }
    let enhanced = fast_generate(client, &enhancement_prompt(prompt)).await;
    let enhanced = enhanced.trim();
    (!enhanced.is_empty()).then(|| enhanced.to_string())
}

#[cfg(test)]
mod tests {
    use super::{enhance_prompt, enhancement_prompt, fast_generate};
    use crate::client::GenAiClient;
    use crate::client::testing::FakeTransport;
    use crate::error::GenAiError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn template_quotes_the_prompt() {
        assert!(enhancement_prompt("a cat").ends_with("Keep it under 50 words. Prompt: \"a cat\""));
    }

    #[test]
    fn enhancement_is_trimmed() {
        let fake = FakeTransport::replying(
            200,
            json!({"candidates": [{"content": {"parts": [{"text": "  A luminous cat  \n"}]}}]}),
        );
        let client = GenAiClient::new(&fake, "k");
        assert_eq!(
            pollster::block_on(enhance_prompt(&client, "a cat")),
            Some("A luminous cat".to_string())
        );
        let body = fake.last_body();
        assert_eq!(body["contents"][0]["parts"][0]["text"], enhancement_prompt("a cat"));
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn failures_are_swallowed() {
        let fake = FakeTransport::failing(GenAiError::Transport("offline".into()));
        let client = GenAiClient::new(&fake, "k");
        assert_eq!(pollster::block_on(fast_generate(&client, "x")), "");

        let fake = FakeTransport::failing(GenAiError::Transport("offline".into()));
        let client = GenAiClient::new(&fake, "k");
        assert_eq!(pollster::block_on(enhance_prompt(&client, "x")), None);
    }

    #[test]
    fn blank_prompt_is_not_sent() {
        let fake = FakeTransport::default();
        let client = GenAiClient::new(&fake, "k");
        assert_eq!(pollster::block_on(enhance_prompt(&client, "  ")), None);
        assert!(fake.sent.borrow().is_empty());
    }
}
