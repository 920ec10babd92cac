use reqwest::StatusCode;
use thiserror::Error;

/// Reasons a provider request produced no quote.
///
/// These never leave an adapter; they are logged and collapsed into `None`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    HttpError(StatusCode),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("missing field `{0}`")]
    FieldMissing(&'static str),
}

pub type FetchResult<T> = Result<T, FetchError>;
