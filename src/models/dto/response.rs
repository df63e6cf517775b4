use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Question, Quiz, QuizSession, User};
use crate::services::scoring;

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: crate::models::domain::UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Question as shown to a participant: answer correctness is stripped so the
/// payload cannot be mined for solutions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub order: i16,
    pub text: String,
    pub answers: Vec<AnswerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub id: String,
    pub text: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            order: question.order,
            text: question.text.clone(),
            answers: question
                .answers
                .iter()
                .map(|a| AnswerView {
                    id: a.id.clone(),
                    text: a.text.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub quiz_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: crate::models::domain::SessionStatus,
    pub access_code: String,
    pub duration_minutes: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Recomputed from start_time and duration at response time.
    pub remaining_seconds: i64,
}

impl SessionView {
    pub fn from_session(session: &QuizSession, now: DateTime<Utc>) -> Self {
        SessionView {
            id: session.id.clone(),
            quiz_id: session.quiz_id.clone(),
            title: session.title.clone(),
            description: session.description.clone(),
            status: session.status,
            access_code: session.access_code.clone(),
            duration_minutes: session.duration_minutes,
            start_time: session.start_time,
            end_time: session.end_time,
            remaining_seconds: session.remaining_seconds(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinSessionResponse {
    pub participant_id: String,
    pub session: SessionView,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct ScoreSummary {
    pub score: i16,
    pub max_score: i16,
    pub accuracy: u8,
    pub is_passing: bool,
    pub time_taken_seconds: Option<i64>,
}

impl ScoreSummary {
    pub fn new(score: i16, max_score: i16, time_taken_seconds: Option<i64>) -> Self {
        let accuracy = scoring::accuracy(score, max_score);
        ScoreSummary {
            score,
            max_score,
            accuracy,
            is_passing: scoring::is_passing(accuracy),
            time_taken_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position; strictly increasing even on ties.
    pub rank: usize,
    pub display_name: String,
    pub score: i16,
    pub max_score: i16,
    pub accuracy: u8,
    pub time_taken_seconds: i64,
}

/// Outcome of a generation run. `degraded` means the model output needed
/// repair and the author should review the quiz before publishing it.
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub quiz: Quiz,
    pub degraded: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}
