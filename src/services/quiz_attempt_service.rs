use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::QuizAttempt,
        dto::{
            request::SubmitAnswersRequest,
            response::{LeaderboardEntry, ScoreSummary},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{leaderboard, scoring},
};

/// Practice mode. Attempts are personal and untimed; the quiz is scored the
/// same way a live session is, but there is no access code or deadline.
pub struct QuizAttemptService {
    attempts: Arc<dyn QuizAttemptRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizAttemptService {
    pub fn new(attempts: Arc<dyn QuizAttemptRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { attempts, quizzes }
    }

    pub async fn start_attempt(&self, quiz_id: &str, claims: &Claims) -> AppResult<QuizAttempt> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        let attempt = QuizAttempt::new(&quiz.id, &claims.sub, quiz.question_count);
        log::info!(
            "User {} started attempt {} on quiz {}",
            claims.sub,
            attempt.id,
            quiz.id
        );
        self.attempts.create(attempt).await
    }

    /// Scores and completes the attempt. An attempt can be submitted once;
    /// a second submission is rejected rather than rescored.
    pub async fn submit_attempt(
        &self,
        attempt_id: &str,
        request: SubmitAnswersRequest,
        claims: &Claims,
    ) -> AppResult<ScoreSummary> {
        let mut attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.user_id != claims.sub {
            return Err(AppError::Forbidden(
                "Attempt belongs to another user".to_string(),
            ));
        }
        if attempt.completed {
            return Err(AppError::InvalidState(
                "Attempt has already been submitted".to_string(),
            ));
        }

        let quiz = self
            .quizzes
            .find_by_id(&attempt.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", attempt.quiz_id))
            })?;

        let result = scoring::score_selections(&quiz.questions, &request.selections);
        attempt.complete(result.score, Utc::now());
        let attempt = self.attempts.update(attempt).await?;

        Ok(ScoreSummary::new(
            attempt.score,
            attempt.max_score,
            attempt.time_taken_seconds,
        ))
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        self.attempts.list_by_user(user_id).await
    }

    /// Ranked board of completed attempts for one quiz, ordered the same way
    /// as a live session leaderboard.
    pub async fn quiz_leaderboard(&self, quiz_id: &str) -> AppResult<Vec<LeaderboardEntry>> {
        let attempts = self.attempts.list_by_quiz(quiz_id).await?;
        Ok(leaderboard::rank_attempts(&attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::UserRole;
    use crate::models::dto::request::AnswerSelection;
    use crate::repositories::{MockQuizAttemptRepository, MockQuizRepository};
    use crate::test_utils::fixtures::quiz_with_questions;

    fn claims_for(user_id: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            role: UserRole::User,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[tokio::test]
    async fn start_attempt_captures_question_count_as_max_score() {
        let quiz = quiz_with_questions("author-1", 5);
        let quiz_id = quiz.id.clone();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        let mut attempts = MockQuizAttemptRepository::new();
        attempts.expect_create().returning(Ok);

        let service = QuizAttemptService::new(Arc::new(attempts), Arc::new(quizzes));
        let attempt = service
            .start_attempt(&quiz_id, &claims_for("user-1"))
            .await
            .unwrap();

        assert_eq!(attempt.max_score, 5);
        assert!(!attempt.completed);
    }

    #[tokio::test]
    async fn submit_scores_correct_selections() {
        let quiz = quiz_with_questions("author-1", 3);
        let attempt = QuizAttempt::new(&quiz.id, "user-1", 3);
        let attempt_id = attempt.id.clone();

        let selections: Vec<AnswerSelection> = quiz
            .questions
            .iter()
            .take(2)
            .map(|q| AnswerSelection {
                question_id: q.id.clone(),
                answer_id: q.correct_answer().unwrap().id.clone(),
            })
            .collect();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(attempt.clone())));
        attempts.expect_update().returning(Ok);

        let service = QuizAttemptService::new(Arc::new(attempts), Arc::new(quizzes));
        let summary = service
            .submit_attempt(
                &attempt_id,
                SubmitAnswersRequest { selections },
                &claims_for("user-1"),
            )
            .await
            .unwrap();

        assert_eq!(summary.score, 2);
        assert_eq!(summary.max_score, 3);
        assert!(!summary.is_passing); // 67%, under the 70% bar
    }

    #[tokio::test]
    async fn submit_twice_is_rejected() {
        let mut attempt = QuizAttempt::new("quiz-1", "user-1", 3);
        attempt.complete(2, Utc::now());
        let attempt_id = attempt.id.clone();

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(attempt.clone())));
        attempts.expect_update().never();

        let service =
            QuizAttemptService::new(Arc::new(attempts), Arc::new(MockQuizRepository::new()));
        let result = service
            .submit_attempt(
                &attempt_id,
                SubmitAnswersRequest { selections: vec![] },
                &claims_for("user-1"),
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn submit_rejects_another_users_attempt() {
        let attempt = QuizAttempt::new("quiz-1", "user-1", 3);
        let attempt_id = attempt.id.clone();

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(attempt.clone())));

        let service =
            QuizAttemptService::new(Arc::new(attempts), Arc::new(MockQuizRepository::new()));
        let result = service
            .submit_attempt(
                &attempt_id,
                SubmitAnswersRequest { selections: vec![] },
                &claims_for("intruder"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
