pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("session id must not be empty")]
    EmptySessionId,
    #[error("unknown session: {0}")]
    UnknownSession(String),
}

/// Failure surface of the external collaborators (transcription, extraction,
/// persistence). The pipeline degrades on these rather than aborting a call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("service call timed out")]
    Timeout,
    #[error("malformed service response: {0}")]
    Malformed(String),
}
