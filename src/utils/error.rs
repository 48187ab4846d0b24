use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid config value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{detail}")]
    InvalidInput { detail: String },
}

impl ApiError {
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
