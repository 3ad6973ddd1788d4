/// Failure reported by any backend-facing source.
///
/// Sources translate transport details into this shape; each workflow maps it
/// onto its own error with user-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Unauthorized,
    /// Timeout or network failure; retrying later may help.
    Unavailable,
    NotFound(String),
    /// The backend answered with an error detail.
    Rejected(String),
    /// The payload could not be decoded.
    InvalidData(String),
}

impl SourceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "SOURCE_UNAUTHORIZED",
            Self::Unavailable => "SOURCE_UNAVAILABLE",
            Self::NotFound(_) => "SOURCE_NOT_FOUND",
            Self::Rejected(_) => "SOURCE_REJECTED",
            Self::InvalidData(_) => "SOURCE_INVALID_DATA",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Session expired. Run `siteadmin login` again.".to_owned(),
            Self::Unavailable => "Server is unreachable. Check the connection and retry.".to_owned(),
            Self::NotFound(detail) if detail.is_empty() => "Not found.".to_owned(),
            Self::NotFound(detail) | Self::Rejected(detail) => detail.clone(),
            Self::InvalidData(_) => "Server sent an unexpected response.".to_owned(),
        }
    }
}
