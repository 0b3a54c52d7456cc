use crate::client::{CHAT_MODEL, GenAiClient, Transport};
use crate::wire::{Content, GenerateContentRequest};
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hello! I am Lumina AI. Ask me anything about our web design services or 3D capabilities.";

pub const SYSTEM_INSTRUCTION: &str = "Você é a Onzy, uma assistente de IA útil para uma agência de web design premium e futurista. Você tem conhecimento sobre desenvolvimento web, design 3D, WebGL e marketing digital. Seja conciso, profissional, criativo e amigável. Responda sempre em Português do Brasil.";

/// Shown when the model answered without any text.
pub const EMPTY_REPLY: &str = "Desculpe, não consegui gerar uma resposta.";

/// Shown when the provider could not be reached or refused the request.
pub const FAILED_REPLY: &str = "Ocorreu um erro ao conectar com a IA.";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Append-only conversation log, seeded with the assistant greeting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatHistory {
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::new(Role::Model, GREETING)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    fn to_contents(&self) -> Vec<Content> {
        self.turns
            .iter()
            .map(|t| Content::with_role(t.role.as_str(), &t.text))
            .collect()
    }
}

/// Builds the request for `message` given the turns before it.
pub fn chat_request(history: &ChatHistory, message: &str) -> GenerateContentRequest {
    let mut contents = history.to_contents();
    contents.push(Content::user(message));
    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::plain(SYSTEM_INSTRUCTION)),
        generation_config: None,
    }
}

/// Asks the chat model for a reply. Never fails: provider problems become
/// one of the fixed fallback replies.
pub async fn send_message<T: Transport>(
    client: &GenAiClient<T>,
    history: &ChatHistory,
    message: &str,
) -> String {
    match client
        .generate(CHAT_MODEL, &chat_request(history, message))
        .await
    {
        Ok(resp) => {
            let text = resp.text();
            if text.is_empty() {
                EMPTY_REPLY.to_string()
            } else {
                text
            }
        }
        Err(err) => {
            tracing::error!(%err, "chat request failed");
            FAILED_REPLY.to_string()
        }
    }
}

/// A chat widget's conversation plus its in-flight flag.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    history: ChatHistory,
    pending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records the user's turn and returns the history to send with it, or
    /// `None` when the input is blank or a reply is still pending.
    pub fn begin(&mut self, input: &str) -> Option<(ChatHistory, String)> {
        if input.trim().is_empty() || self.pending {
            return None;
        }
        let prior = self.history.clone();
        self.history.push(Turn::new(Role::User, input));
        self.pending = true;
        Some((prior, input.to_string()))
    }

    pub fn finish(&mut self, reply: String) {
        self.history.push(Turn::new(Role::Model, reply));
        self.pending = false;
    }

    /// `begin`, request, `finish` in one go.
    pub async fn send<T: Transport>(&mut self, client: &GenAiClient<T>, input: &str) -> Option<&Turn> {
        let (prior, message) = self.begin(input)?;
        let reply = send_message(client, &prior, &message).await;
        self.finish(reply);
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatHistory, ChatSession, EMPTY_REPLY, FAILED_REPLY, Role, SYSTEM_INSTRUCTION, send_message};
    use crate::client::GenAiClient;
    use crate::client::testing::FakeTransport;
    use crate::error::GenAiError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn reply(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
    }

    #[test]
    fn history_starts_with_greeting() {
        let h = ChatHistory::new();
        assert_eq!(h.len(), 1);
        assert_eq!(h.turns()[0].role, Role::Model);
    }

    #[test]
    fn sends_prior_turns_then_message_with_system_instruction() {
        let fake = FakeTransport::replying(200, reply("Oi!"));
        let client = GenAiClient::new(&fake, "k");
        let text = pollster::block_on(send_message(&client, &ChatHistory::new(), "olá"));
        assert_eq!(text, "Oi!");

        let body = fake.last_body();
        assert_eq!(body["contents"].as_array().map(|c| c.len()), Some(2));
        assert_eq!(body["contents"][0]["role"], "model");
        assert_eq!(body["contents"][1], json!({"role": "user", "parts": [{"text": "olá"}]}));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
    }

    #[test]
    fn empty_reply_uses_fallback() {
        let fake = FakeTransport::replying(200, json!({"candidates": []}));
        let client = GenAiClient::new(&fake, "k");
        let text = pollster::block_on(send_message(&client, &ChatHistory::new(), "hi"));
        assert_eq!(text, EMPTY_REPLY);
    }

    #[test]
    fn failures_never_escape() {
        let fake = FakeTransport::failing(GenAiError::Transport("offline".into()));
        let client = GenAiClient::new(&fake, "k");
        let text = pollster::block_on(send_message(&client, &ChatHistory::new(), "hi"));
        assert_eq!(text, FAILED_REPLY);

        let fake = FakeTransport::replying(500, json!({"error": {"code": 500, "message": "boom"}}));
        let client = GenAiClient::new(&fake, "k");
        let text = pollster::block_on(send_message(&client, &ChatHistory::new(), "hi"));
        assert_eq!(text, FAILED_REPLY);
    }

    #[test]
    fn session_appends_both_turns() {
        let fake = FakeTransport::replying(200, reply("Claro."));
        let client = GenAiClient::new(&fake, "k");
        let mut session = ChatSession::new();
        let last = pollster::block_on(session.send(&client, "pode ajudar?")).cloned();
        assert_eq!(last.map(|t| t.text), Some("Claro.".to_string()));
        assert_eq!(session.history().len(), 3);
        assert!(!session.is_pending());
    }

    #[test]
    fn session_ignores_blank_and_overlapping_input() {
        let mut session = ChatSession::new();
        assert!(session.begin("   ").is_none());
        assert!(session.begin("first").is_some());
        assert!(session.begin("second").is_none());
        session.finish("ok".into());
        assert_eq!(session.history().len(), 3);
    }
}
