use scene::TimelineError;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum SiteError {
    NoWindow,
    NoDocument,
    MissingElement(String),
    Config(String),
    Timeline(TimelineError),
    Gpu(String),
}

impl std::fmt::Display for SiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteError::NoWindow => write!(f, "window missing"),
            SiteError::NoDocument => write!(f, "document missing"),
            SiteError::MissingElement(id) => write!(f, "element #{id} missing"),
            SiteError::Config(msg) => write!(f, "invalid site config: {msg}"),
            SiteError::Timeline(err) => write!(f, "timeline rejected: {err}"),
            SiteError::Gpu(msg) => write!(f, "gpu: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteError::Timeline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TimelineError> for SiteError {
    fn from(err: TimelineError) -> Self {
        SiteError::Timeline(err)
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
