#[derive(Debug, Clone, PartialEq)]
pub enum GenAiError {
    MissingApiKey,
    /// The request never produced a response (network, CORS, abort).
    Transport(String),
    /// Non-success HTTP status with the provider's message when it sent one.
    Api { status: u16, message: String },
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for GenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenAiError::MissingApiKey => write!(f, "no API key configured"),
            GenAiError::Transport(msg) => write!(f, "request failed: {msg}"),
            GenAiError::Api { status, message } => write!(f, "provider error {status}: {message}"),
            GenAiError::Encode(msg) => write!(f, "could not encode request: {msg}"),
            GenAiError::Decode(msg) => write!(f, "could not decode response: {msg}"),
        }
    }
}

impl std::error::Error for GenAiError {}
