/// Error types for adapter operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("invalid API key: expected \"accessToken:refreshToken\"")]
    InvalidCredential,

    #[error("missing configuration value: {0}")]
    ConfigurationMissing(&'static str),

    /// Raised when Teamleader rejects a call because the access token has
    /// expired. Recovered internally by a single refresh-and-retry; never
    /// surfaced to the host.
    #[error("access token has expired, a refresh is required")]
    AccessTokenExpired,

    #[error("Teamleader request failed with status {status}: {body}")]
    VendorRequestFailed { status: u16, body: String },

    #[error("authorization denied by user")]
    AuthorizationDenied,

    #[error("could not convert Teamleader record: {0}")]
    MappingFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
