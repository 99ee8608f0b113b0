use thiserror::Error;

pub type Result<T> = std::result::Result<T, EventRegistryError>;

#[derive(Debug, Error)]
pub enum EventRegistryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for EventRegistryError {
    fn from(err: reqwest::Error) -> Self {
        EventRegistryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for EventRegistryError {
    fn from(err: serde_json::Error) -> Self {
        EventRegistryError::Parse(err.to_string())
    }
}
