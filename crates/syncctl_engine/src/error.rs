use syncctl_core::{FailureClass, RequestFailure};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacadeError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl FacadeError {
    /// Timeouts, connection failures and 5xx are transient; everything the
    /// server refused or sent back malformed is a rejection.
    pub fn class(&self) -> FailureClass {
        match self {
            FacadeError::Timeout | FacadeError::Network(_) | FacadeError::Server { .. } => {
                FailureClass::Transient
            }
            FacadeError::InvalidUrl(_) | FacadeError::Rejected { .. } | FacadeError::Decode(_) => {
                FailureClass::Rejection
            }
        }
    }

    pub(crate) fn from_status(status: u16, message: String) -> Self {
        if status >= 500 {
            FacadeError::Server { status, message }
        } else {
            FacadeError::Rejected { status, message }
        }
    }
}

impl From<reqwest::Error> for FacadeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FacadeError::Timeout;
        }
        if err.is_decode() {
            return FacadeError::Decode(err.to_string());
        }
        FacadeError::Network(err.to_string())
    }
}

impl From<url::ParseError> for FacadeError {
    fn from(err: url::ParseError) -> Self {
        FacadeError::InvalidUrl(err.to_string())
    }
}

impl From<FacadeError> for RequestFailure {
    fn from(err: FacadeError) -> Self {
        RequestFailure {
            class: err.class(),
            message: err.to_string(),
        }
    }
}
