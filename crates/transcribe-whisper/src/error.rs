use tiqn_intake_core::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("transcription api returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) if e.is_timeout() => ServiceError::Timeout,
            Error::Http(e) if e.is_decode() => ServiceError::Malformed(e.to_string()),
            Error::Http(e) => ServiceError::Unavailable(e.to_string()),
            Error::Api { status, body } => {
                ServiceError::Unavailable(format!("transcription api returned {status}: {body}"))
            }
        }
    }
}
