//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::ClockError;

/// Errors emitted by the submission boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission endpoint unreachable: {0}")]
    Unreachable(String),
}

/// Errors emitted by the integrity monitor configuration.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum IntegrityError {
    #[error("flag probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

/// Errors emitted by the assessment session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("environment pre-check is not complete")]
    NotReady,
    #[error("session has not started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("navigation target {index} outside of 0..{len}")]
    InvalidNavigation { index: usize, len: usize },
    #[error("submission already in flight")]
    SubmissionInFlight,
    #[error("session already terminated")]
    Terminated,
    #[error(transparent)]
    Clock(#[from] ClockError),
}
