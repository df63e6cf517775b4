use serde::Deserialize;
use validator::Validate;

use crate::models::domain::quiz::{Difficulty, SourceKind};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub role: Option<crate::models::domain::UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub difficulty: Difficulty,

    pub source_kind: SourceKind,

    /// Raw text for text/pdf/youtube sources, a URL for url sources.
    #[validate(length(min = 1))]
    pub source: String,

    #[validate(range(min = 1, max = 50))]
    pub question_count: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub quiz_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinSessionRequest {
    #[validate(length(min = 6, max = 6))]
    pub access_code: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

/// One selected answer per question; single-select only.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSelection {
    pub question_id: String,
    pub answer_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswersRequest {
    pub selections: Vec<AnswerSelection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}
