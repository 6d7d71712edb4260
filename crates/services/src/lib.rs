#![forbid(unsafe_code)]

pub mod capability;
pub mod clock_driver;
pub mod error;
pub mod integrity;
pub mod sessions;
pub mod submission;

pub use assess_core::Clock;

pub use capability::{CapabilityOutcome, CapabilityProbe, PermissionGate};
pub use clock_driver::ClockDriver;
pub use error::{IntegrityError, SessionError, SubmissionError};
pub use integrity::{
    IntegrityEvent, IntegrityMonitor, IntegrityTrigger, RandomTrigger, ScriptedTrigger,
};
pub use sessions::{
    AssessmentSession, NavigatorEntry, Outcome, QuestionStatus, SessionCommand, SessionPhase,
    SessionRuntime, SessionView,
};
pub use submission::{SubmissionPayload, SubmissionReceipt, SubmissionSink};
