mod runtime;
mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use runtime::{SessionCommand, SessionRuntime};
pub use service::{AssessmentSession, Outcome, SessionPhase};
pub use view::{NavigatorEntry, QuestionStatus, SessionView};
