use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use assess_core::model::AttemptId;

use crate::error::SubmissionError;

/// Finalized answer set and session metadata handed to the submission sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub attempt_id: AttemptId,
    /// Question id (as text) to raw response value.
    pub answers: HashMap<String, String>,
    pub answered_count: usize,
    pub integrity_flag_count: u32,
    pub elapsed_secs: i64,
    /// Opaque candidate/device metadata collected outside this core.
    pub metadata: serde_json::Value,
}

/// Terminal outcome reported by the sink on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub result_id: Option<String>,
    pub message: Option<String>,
}

/// External collaborator that accepts the finalized submission.
///
/// Invoked at most once per session; the session controller owns that
/// invariant. No retry or timeout is imposed here — callers layer those
/// concerns outside the core.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload)
    -> Result<SubmissionReceipt, SubmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_text_keys() {
        let mut answers = HashMap::new();
        answers.insert("1".to_string(), "A".to_string());

        let payload = SubmissionPayload {
            attempt_id: AttemptId::generate(),
            answers,
            answered_count: 1,
            integrity_flag_count: 2,
            elapsed_secs: 10,
            metadata: serde_json::json!({ "browser": "firefox" }),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["answers"]["1"], "A");
        assert_eq!(json["integrity_flag_count"], 2);
        assert_eq!(json["metadata"]["browser"], "firefox");
    }
}
