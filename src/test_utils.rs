pub mod fixtures {
    use crate::models::domain::{
        Answer, Difficulty, Question, Quiz, QuizSession, SessionParticipant, SourceKind, User,
    };

    pub fn test_user(username: &str) -> User {
        User::new(
            username,
            &format!("{}@example.com", username),
            username,
            "hash",
        )
    }

    /// Quiz with `n` four-option questions; the first option is correct.
    pub fn quiz_with_questions(author_id: &str, n: usize) -> Quiz {
        let mut quiz = Quiz::new(
            "Fixture quiz",
            None,
            None,
            Difficulty::Medium,
            author_id,
            SourceKind::Text,
            None,
        );
        let questions = (0..n)
            .map(|i| {
                let answers = (0..4)
                    .map(|j| Answer::new(&format!("q{} option {}", i, j), j == 0))
                    .collect();
                Question::new(&format!("Question {}", i + 1), None, answers)
            })
            .collect();
        quiz.set_questions(questions);
        quiz
    }

    pub fn pending_session(quiz: &Quiz, owner_id: &str) -> QuizSession {
        QuizSession::new(&quiz.id, owner_id, "Fixture session", None, 30)
    }

    pub fn completed_participant(
        session_id: &str,
        name: &str,
        score: i16,
        max_score: i16,
        time_taken: i64,
    ) -> SessionParticipant {
        let mut participant = SessionParticipant::new(session_id, name, None);
        participant.score = score;
        participant.max_score = max_score;
        participant.completed = true;
        participant.time_taken_seconds = Some(time_taken);
        participant
    }
}
