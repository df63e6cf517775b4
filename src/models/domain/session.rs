use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Fixed external contract: I, O, 0 and 1 are excluded to avoid visual
/// ambiguity in shared codes.
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ACCESS_CODE_LEN: usize = 6;

static ACCESS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-HJ-NP-Z2-9]{6}$").expect("access code pattern is valid"));

pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| ACCESS_CODE_ALPHABET[rng.gen_range(0..ACCESS_CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn is_valid_access_code(code: &str) -> bool {
    ACCESS_CODE_RE.is_match(code)
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

/// A time-boxed shared instance of a quiz. The only legal transitions are
/// pending -> active -> completed; the end instant is derived from
/// `start_time + duration_minutes` and never stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSession {
    pub id: String,
    pub quiz_id: String,
    pub created_by_user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub access_code: String,
    pub status: SessionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new(
        quiz_id: &str,
        created_by_user_id: &str,
        title: &str,
        description: Option<String>,
        duration_minutes: i64,
    ) -> Self {
        QuizSession {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            created_by_user_id: created_by_user_id.to_string(),
            title: title.to_string(),
            description,
            duration_minutes,
            access_code: generate_access_code(),
            status: SessionStatus::Pending,
            start_time: None,
            end_time: None,
            created_at: Some(Utc::now()),
        }
    }

    /// Pending -> Active. Any other source state is rejected.
    pub fn start(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        match self.status {
            SessionStatus::Pending => {
                self.status = SessionStatus::Active;
                self.start_time = Some(now);
                Ok(())
            }
            _ => Err(AppError::InvalidState(format!(
                "Session cannot be started from the '{}' state",
                self.status.as_str()
            ))),
        }
    }

    /// Active -> Completed. Ending an already-completed session is a no-op
    /// (returns false); ending a pending session is rejected.
    pub fn end(&mut self, now: DateTime<Utc>) -> AppResult<bool> {
        match self.status {
            SessionStatus::Active => {
                self.status = SessionStatus::Completed;
                self.end_time = Some(now);
                Ok(true)
            }
            SessionStatus::Completed => Ok(false),
            SessionStatus::Pending => Err(AppError::InvalidState(
                "Session has not been started".to_string(),
            )),
        }
    }

    /// Absolute instant at which the session runs out of time. None until
    /// the session has been started.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .map(|start| start + Duration::minutes(self.duration_minutes))
    }

    /// Remaining seconds, recomputed from authoritative fields. Clients must
    /// never trust a stored countdown value.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.deadline() {
            Some(deadline) => (deadline - now).num_seconds().max(0),
            None => 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Active && self.remaining_seconds(now) == 0
    }
}
