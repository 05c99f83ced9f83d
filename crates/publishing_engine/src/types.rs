use std::fmt;

use publishing_core::{ArticleId, StatusSnapshot, TrackerError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEvent {
    Started {
        article_id: ArticleId,
        outcome: StartOutcome,
    },
    Progress(StatusSnapshot),
    /// A poll failed in transport or decoding; the next tick proceeds.
    PollSkipped { reason: String },
    Completed(StatusSnapshot),
    Failed { message: String },
    TimedOut { message: String },
    Stopped,
}

impl TranslationEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranslationEvent::Completed(_)
                | TranslationEvent::Failed { .. }
                | TranslationEvent::TimedOut { .. }
                | TranslationEvent::Stopped
        )
    }
}

/// What the backend handed back when it accepted a translation job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartOutcome {
    pub execution: Option<serde_json::Value>,
    pub status_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: FailureKind,
    pub message: String,
}

impl EngineError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EngineError {}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::new(FailureKind::Validation, err.to_string())
    }
}

impl From<TrackerError> for EngineError {
    fn from(err: TrackerError) -> Self {
        EngineError::new(FailureKind::AlreadyRunning, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    AlreadyRunning,
    InvalidUrl,
    HttpStatus(u16),
    /// 2xx response with `success: false`.
    Backend,
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "validation error"),
            FailureKind::AlreadyRunning => write!(f, "already running"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Backend => write!(f, "backend error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
