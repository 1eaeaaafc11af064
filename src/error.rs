use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any request was made, e.g. a blank required field.
    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Api(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Text shown to the user in an error notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Api(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
