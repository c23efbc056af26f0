use std::fmt;

use newsdesk_core::{Article, FailureClass};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FetchCompleted {
        generation: u64,
        result: Result<Vec<Article>, FetchError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start fetch runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    HttpStatus(u16),
    /// The API answered with an error body.
    Api,
    MalformedPayload,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl FailureKind {
    pub fn class(&self) -> FailureClass {
        match self {
            FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
                FailureClass::Network
            }
            FailureKind::HttpStatus(_)
            | FailureKind::Api
            | FailureKind::MalformedPayload
            | FailureKind::TooLarge { .. } => FailureClass::Api,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Api => write!(f, "api error"),
            FailureKind::MalformedPayload => write!(f, "malformed payload"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
