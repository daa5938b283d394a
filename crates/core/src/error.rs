use thiserror::Error;

/// Service error codes the hosting service uses for throttling or its own faults
const TRANSIENT_SERVICE_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "ServiceUnavailable",
    "ServiceUnavailableException",
    "InternalFailure",
    "InternalServerError",
    "EncryptionKeyUnavailableException",
];

/// Whether retrying the same call could plausibly succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{operation} failed: {code}: {message}")]
    Service {
        operation: &'static str,
        /// HTTP status of the failed response, when one was received
        status: Option<u16>,
        code: String,
        message: String,
    },

    #[error("{operation} request failed")]
    Transport {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{operation} returned an unreadable response: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation} response is missing `{field}`")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Transport { .. } => ErrorKind::Transient,
            CoreError::Service { status, code, .. }
                if TRANSIENT_SERVICE_CODES.contains(&code.as_str())
                    || matches!(status, Some(s) if *s >= 500 || *s == 429) =>
            {
                ErrorKind::Transient
            }
            _ => ErrorKind::Permanent,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
