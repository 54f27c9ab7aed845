use stakenode_bls::PublicKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("Request failed with status code: {status_code}")]
    RequestFailed { status_code: reqwest::StatusCode },

    #[error("Request failed with status code: {status_code}, message: {message}")]
    RequestFailedWithMessage {
        status_code: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Failed to decode JSON response: {0}")]
    JsonDecodeError(#[from] serde_json::Error),

    #[error("Validator {0} not found")]
    ValidatorNotFound(PublicKey),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
