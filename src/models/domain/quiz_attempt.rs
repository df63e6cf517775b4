use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user's solo completion record for a quiz (practice mode).
/// Created on start, mutated exactly once at submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: i16,
    /// Question count at attempt creation.
    pub max_score: i16,
    pub completed: bool,
    pub time_taken_seconds: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    pub fn new(quiz_id: &str, user_id: &str, max_score: i16) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            score: 0,
            max_score,
            completed: false,
            time_taken_seconds: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn complete(&mut self, score: i16, now: DateTime<Utc>) {
        self.score = score;
        self.completed = true;
        self.completed_at = Some(now);
        self.time_taken_seconds = Some((now - self.started_at).num_seconds().max(0));
    }
}
