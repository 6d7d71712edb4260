mod answer;
mod clock;
mod ids;
mod permission;
mod question;

pub use answer::AnswerSheet;
pub use clock::{ClockEdge, ClockError, ClockTick, NEAR_EXPIRY_THRESHOLD_SECS, SessionClock};
pub use ids::{AttemptId, ParseIdError, QuestionId};
pub use permission::{Capability, PermissionState};
pub use question::{Difficulty, Question, QuestionError, QuestionKind};
