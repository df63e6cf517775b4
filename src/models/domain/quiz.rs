use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub created_by_user_id: String,
    /// Questions are embedded so deleting a quiz removes them and their
    /// answers in one operation.
    pub questions: Vec<Question>,
    /// Cached count, kept equal to `questions.len()` on every write.
    pub question_count: i16,
    pub source_kind: SourceKind,
    /// Bounded snippet of the raw source the quiz was generated from.
    pub source_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Pdf,
    Url,
    Youtube,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    /// 1-based display order, contiguous and unique within the quiz.
    pub order: i16,
    pub text: String,
    pub explanation: Option<String>,
    /// May be empty when generation partially failed. That is a degraded
    /// but valid state; when non-empty, exactly one answer is correct.
    pub answers: Vec<Answer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl Quiz {
    pub fn new(
        title: &str,
        description: Option<String>,
        category: Option<String>,
        difficulty: Difficulty,
        created_by_user_id: &str,
        source_kind: SourceKind,
        source_snippet: Option<String>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            category,
            difficulty,
            created_by_user_id: created_by_user_id.to_string(),
            questions: Vec::new(),
            question_count: 0,
            source_kind,
            source_snippet,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Replaces the question list, renumbering orders from 1 and refreshing
    /// the cached count.
    pub fn set_questions(&mut self, mut questions: Vec<Question>) {
        for (index, question) in questions.iter_mut().enumerate() {
            question.quiz_id = self.id.clone();
            question.order = (index + 1) as i16;
        }
        self.question_count = questions.len() as i16;
        self.questions = questions;
        self.modified_at = Some(Utc::now());
    }

    pub fn question_by_id(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Question {
    pub fn new(text: &str, explanation: Option<String>, answers: Vec<Answer>) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: String::new(),
            order: 0,
            text: text.to_string(),
            explanation,
            answers,
        }
    }

    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }
}

impl Answer {
    pub fn new(text: &str, is_correct: bool) -> Self {
        Answer {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_correct,
        }
    }
}
