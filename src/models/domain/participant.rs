use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A joined member of a shared session. Participants may be anonymous;
/// authenticated users get at most one record per session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionParticipant {
    pub id: String,
    pub session_id: String,
    pub display_name: String,
    pub user_id: Option<String>,
    pub score: i16,
    pub max_score: i16,
    pub completed: bool,
    pub time_taken_seconds: Option<i64>,
    pub joined_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionParticipant {
    pub fn new(session_id: &str, display_name: &str, user_id: Option<&str>) -> Self {
        SessionParticipant {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            display_name: display_name.to_string(),
            user_id: user_id.map(|u| u.to_string()),
            score: 0,
            max_score: 0,
            completed: false,
            time_taken_seconds: None,
            joined_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Records the final result. Terminal for this participant regardless of
    /// the session's own status.
    pub fn complete(&mut self, score: i16, max_score: i16, now: DateTime<Utc>) {
        self.score = score;
        self.max_score = max_score;
        self.completed = true;
        self.completed_at = Some(now);
        self.time_taken_seconds = Some((now - self.joined_at).num_seconds().max(0));
    }
}
