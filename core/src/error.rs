use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Message suitable for showing to the operator. Server-provided
    /// messages win; everything else falls back to the supplied default.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
