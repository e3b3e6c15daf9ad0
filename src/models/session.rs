use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state_machine::SessionStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub status: SessionStatus,
    pub study_activity_id: i64,
}

impl StudySession {
    /// `completed` if and only if both the end time and the score are present.
    pub fn is_consistent(&self) -> bool {
        let closed = self.end_time.is_some() && self.score.is_some();
        match self.status {
            SessionStatus::Completed => closed,
            SessionStatus::InProgress | SessionStatus::Abandoned => {
                self.end_time.is_none() && self.score.is_none()
            }
        }
    }
}

pub(crate) fn rounded_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds().max(0);
    (millis + 500) / 1000
}

/// Fields a caller may overwrite through the low-level update path.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub id: i64,
    pub end_time: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub status: SessionStatus,
}

impl From<&StudySession> for SessionUpdate {
    fn from(session: &StudySession) -> Self {
        Self {
            id: session.id,
            end_time: session.end_time,
            score: session.score,
            status: session.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordReviewItem {
    pub id: i64,
    pub session_id: i64,
    pub word_id: i64,
    pub is_correct: bool,
    pub reviewed_at: DateTime<Utc>,
}
