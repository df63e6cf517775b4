use std::collections::HashMap;

use crate::models::domain::Question;
use crate::models::dto::request::AnswerSelection;

/// Accuracy threshold for the "passing" UI affordance. Not stored anywhere.
pub const PASSING_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: String,
    pub selected_answer_id: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i16,
    pub max_score: i16,
    pub question_results: Vec<QuestionResult>,
}

/// Grades a set of single-select answers against a quiz's questions.
///
/// Every question counts toward max_score whether or not it was answered.
/// A question with no answers can never be correct; selections referencing
/// unknown questions or answers are simply wrong, not errors.
pub fn score_selections(questions: &[Question], selections: &[AnswerSelection]) -> ScoreResult {
    let selected: HashMap<&str, &str> = selections
        .iter()
        .map(|s| (s.question_id.as_str(), s.answer_id.as_str()))
        .collect();

    let mut score: i16 = 0;
    let mut question_results = Vec::with_capacity(questions.len());

    for question in questions {
        let selected_answer_id = selected.get(question.id.as_str()).copied();
        let is_correct = match (selected_answer_id, question.correct_answer()) {
            (Some(answer_id), Some(correct)) => answer_id == correct.id,
            _ => false,
        };

        if is_correct {
            score += 1;
        }

        question_results.push(QuestionResult {
            question_id: question.id.clone(),
            selected_answer_id: selected_answer_id.map(|s| s.to_string()),
            is_correct,
        });
    }

    ScoreResult {
        score,
        max_score: questions.len() as i16,
        question_results,
    }
}

/// Percentage accuracy, rounded. A zero-question quiz is 0%, never NaN.
pub fn accuracy(score: i16, max_score: i16) -> u8 {
    if max_score <= 0 {
        return 0;
    }
    let pct = (score.max(0) as f64 / max_score as f64) * 100.0;
    pct.round() as u8
}

pub fn is_passing(accuracy: u8) -> bool {
    accuracy >= PASSING_THRESHOLD
}
