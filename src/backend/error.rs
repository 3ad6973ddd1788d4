use thiserror::Error;

use super::lenient::DecodeError;
use crate::usecases::contracts::SourceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] DecodeError),
    #[error("session storage failed: {0}")]
    TokenStore(String),
}

impl ApiError {
    /// Failures worth retrying: the request never got a verdict from the backend.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "API_TIMEOUT",
            Self::Network(_) => "API_NETWORK",
            Self::Unauthorized => "API_UNAUTHORIZED",
            Self::NotFound(_) => "API_NOT_FOUND",
            Self::Backend { .. } => "API_BACKEND_ERROR",
            Self::Decode(_) => "API_DECODE_FAILED",
            Self::TokenStore(_) => "API_TOKEN_STORE_FAILED",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(DecodeError::Shape {
                expected: "json",
                found: "malformed body",
            })
        } else {
            Self::Network(error.without_url().to_string())
        }
    }
}

impl From<ApiError> for SourceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Timeout | ApiError::Network(_) => SourceError::Unavailable,
            ApiError::Unauthorized | ApiError::TokenStore(_) => SourceError::Unauthorized,
            ApiError::NotFound(detail) => SourceError::NotFound(detail),
            ApiError::Backend { detail, .. } => SourceError::Rejected(detail),
            ApiError::Decode(DecodeError::Backend(detail)) => SourceError::Rejected(detail),
            ApiError::Decode(other) => SourceError::InvalidData(other.to_string()),
        }
    }
}
