use std::sync::Arc;

use crate::{
    auth::{require_owner_or_admin, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz, SourceKind},
        dto::request::CreateQuizRequest,
    },
    repositories::QuizRepository,
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Creates an empty quiz shell. Questions arrive later, either through
    /// generation or a question replacement.
    pub async fn create_quiz(&self, request: CreateQuizRequest, author: &Claims) -> AppResult<Quiz> {
        let quiz = Quiz::new(
            &request.title,
            request.description,
            request.category,
            request.difficulty,
            &author.sub,
            SourceKind::Text,
            None,
        );

        log::info!("User {} created quiz {}", author.sub, quiz.id);
        self.quizzes.create(quiz).await
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list_quizzes(&self, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        self.quizzes.list(offset, limit).await
    }

    pub async fn list_by_author(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        self.quizzes.list_by_author(user_id, offset, limit).await
    }

    /// Replaces the quiz's question list. The embedded representation keeps
    /// `question_count` and question ordering consistent in the same write.
    pub async fn replace_questions(
        &self,
        quiz_id: &str,
        questions: Vec<Question>,
        claims: &Claims,
    ) -> AppResult<Quiz> {
        let mut quiz = self.get_quiz(quiz_id).await?;
        require_owner_or_admin(claims, &quiz.created_by_user_id)?;

        quiz.set_questions(questions);
        self.quizzes.update(quiz).await
    }

    /// Deletes the quiz and, because questions and answers are embedded,
    /// everything under it in one operation.
    pub async fn delete_quiz(&self, id: &str, claims: &Claims) -> AppResult<()> {
        let quiz = self.get_quiz(id).await?;
        require_owner_or_admin(claims, &quiz.created_by_user_id)?;

        let deleted = self.quizzes.delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                id
            )));
        }

        log::info!("User {} deleted quiz {}", claims.sub, id);
        Ok(())
    }
}
