use tiqn_intake_core::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("extraction api returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("no json object in model response")]
    MissingJson,
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) if e.is_timeout() => ServiceError::Timeout,
            Error::Http(e) if e.is_decode() => ServiceError::Malformed(e.to_string()),
            Error::Http(e) => ServiceError::Unavailable(e.to_string()),
            Error::Api { status, body } => {
                ServiceError::Unavailable(format!("extraction api returned {status}: {body}"))
            }
            Error::MissingJson => ServiceError::Malformed(Error::MissingJson.to_string()),
        }
    }
}
