use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl Error {
    /// Only faults below the HTTP layer are worth another attempt. Anything the
    /// caller or the upstream contract got wrong will fail the same way again.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            Error::Transport(_) => ErrorClassification {
                error_type: "TransportError",
                retryable: true,
            },
            Error::NotConfigured(_) => ErrorClassification {
                error_type: "NotConfiguredError",
                retryable: false,
            },
            Error::InvalidArgument(_) => ErrorClassification {
                error_type: "InvalidArgumentError",
                retryable: false,
            },
            Error::Protocol(_) => ErrorClassification {
                error_type: "ProtocolError",
                retryable: false,
            },
            Error::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
        }
    }
}
