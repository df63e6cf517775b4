use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use quizrise_server::auth::Claims;
use quizrise_server::errors::{AppError, AppResult, INVALID_ACCESS_CODE_MSG};
use quizrise_server::models::domain::{
    Answer, Difficulty, Question, Quiz, QuizSession, SessionParticipant, SessionStatus,
    SourceKind, UserRole,
};
use quizrise_server::models::dto::request::{
    AnswerSelection, CreateSessionRequest, JoinSessionRequest,
};
use quizrise_server::repositories::{
    ParticipantRepository, QuizRepository, SessionRepository,
};
use quizrise_server::services::session_worker::SessionWorker;
use quizrise_server::services::SessionService;

// In-memory repository implementations so full session flows run without a
// database.

#[derive(Default)]
struct InMemoryQuizzes {
    items: Mutex<Vec<Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizzes {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.items.lock().unwrap().push(quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.items.lock().unwrap().iter().find(|q| q.id == id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        let items = self.items.lock().unwrap();
        let page = items
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, items.len() as i64))
    }

    async fn list_by_author(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let items = self.items.lock().unwrap();
        let mine: Vec<Quiz> = items
            .iter()
            .filter(|q| q.created_by_user_id == user_id)
            .cloned()
            .collect();
        let total = mine.len() as i64;
        let page = mine
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut items = self.items.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|q| q.id == quiz.id) {
            *slot = quiz.clone();
        }
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|q| q.id != id);
        Ok(items.len() < before)
    }
}

#[derive(Default)]
struct InMemorySessions {
    items: Mutex<Vec<QuizSession>>,
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession> {
        let mut items = self.items.lock().unwrap();
        let collision = items.iter().any(|s| {
            s.access_code == session.access_code && s.status != SessionStatus::Completed
        });
        if collision {
            return Err(AppError::AlreadyExists(
                "Access code already in use".to_string(),
            ));
        }
        items.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>> {
        Ok(self.items.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_access_code(&self, access_code: &str) -> AppResult<Option<QuizSession>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.access_code == access_code && s.status != SessionStatus::Completed)
            .cloned())
    }

    async fn list_by_status(&self, status: SessionStatus) -> AppResult<Vec<QuizSession>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<QuizSession>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.created_by_user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, session: QuizSession) -> AppResult<QuizSession> {
        let mut items = self.items.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|s| s.id == session.id) {
            *slot = session.clone();
        }
        Ok(session)
    }
}

#[derive(Default)]
struct InMemoryParticipants {
    items: Mutex<Vec<SessionParticipant>>,
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipants {
    async fn create(&self, participant: SessionParticipant) -> AppResult<SessionParticipant> {
        self.items.lock().unwrap().push(participant.clone());
        Ok(participant)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionParticipant>> {
        Ok(self.items.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_session_and_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Option<SessionParticipant>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.session_id == session_id && p.user_id.as_deref() == Some(user_id))
            .cloned())
    }

    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<SessionParticipant>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn update(&self, participant: SessionParticipant) -> AppResult<SessionParticipant> {
        let mut items = self.items.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|p| p.id == participant.id) {
            *slot = participant.clone();
        }
        Ok(participant)
    }
}

struct Harness {
    service: SessionService,
    sessions: Arc<InMemorySessions>,
    quizzes: Arc<InMemoryQuizzes>,
    quiz: Quiz,
    owner: Claims,
}

fn claims(user_id: &str, role: UserRole) -> Claims {
    Claims {
        sub: user_id.to_string(),
        username: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        role,
        iat: 0,
        exp: 9999999999,
    }
}

async fn harness() -> Harness {
    let quizzes = Arc::new(InMemoryQuizzes::default());
    let sessions = Arc::new(InMemorySessions::default());
    let participants = Arc::new(InMemoryParticipants::default());

    let mut quiz = Quiz::new(
        "Geography",
        None,
        None,
        Difficulty::Easy,
        "host-1",
        SourceKind::Text,
        None,
    );
    let questions = (0..5)
        .map(|i| {
            let answers = (0..4)
                .map(|j| Answer::new(&format!("q{} option {}", i, j), j == 0))
                .collect();
            Question::new(&format!("Question {}", i + 1), None, answers)
        })
        .collect();
    quiz.set_questions(questions);
    quizzes.create(quiz.clone()).await.unwrap();

    let service = SessionService::new(
        sessions.clone() as Arc<dyn SessionRepository>,
        participants as Arc<dyn ParticipantRepository>,
        quizzes.clone() as Arc<dyn QuizRepository>,
    );

    Harness {
        service,
        sessions,
        quizzes,
        quiz,
        owner: claims("host-1", UserRole::User),
    }
}

fn session_request(quiz_id: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        quiz_id: quiz_id.to_string(),
        title: "Friday review".to_string(),
        description: None,
        duration_minutes: 30,
    }
}

fn join_request(code: &str, name: &str) -> JoinSessionRequest {
    JoinSessionRequest {
        access_code: code.to_string(),
        display_name: name.to_string(),
    }
}

fn correct_selections(quiz: &Quiz, count: usize) -> Vec<AnswerSelection> {
    quiz.questions
        .iter()
        .take(count)
        .map(|q| AnswerSelection {
            question_id: q.id.clone(),
            answer_id: q.correct_answer().unwrap().id.clone(),
        })
        .collect()
}

#[tokio::test]
async fn full_session_lifecycle_with_scoring_and_leaderboard() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    assert_eq!(session.status, SessionStatus::Pending);
    assert_eq!(session.access_code.len(), 6);

    // Joining a pending session is rejected with the generic message.
    let err = h
        .service
        .join(join_request(&session.access_code, "Early Bird"), None)
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::InvalidState(msg) if msg == INVALID_ACCESS_CODE_MSG));

    h.service.start_session(&session.id, &h.owner).await.unwrap();

    let alice = h
        .service
        .join(join_request(&session.access_code, "Alice"), None)
        .await
        .unwrap();
    assert_eq!(alice.questions.len(), 5);
    assert_eq!(alice.session.status, SessionStatus::Active);
    assert!(alice.session.remaining_seconds > 0);

    let bob = h
        .service
        .join(join_request(&session.access_code, "Bob"), None)
        .await
        .unwrap();

    let alice_summary = h
        .service
        .submit(&session.id, &alice.participant_id, &correct_selections(&h.quiz, 4))
        .await
        .unwrap();
    assert_eq!(alice_summary.score, 4);
    assert_eq!(alice_summary.max_score, 5);
    assert_eq!(alice_summary.accuracy, 80);
    assert!(alice_summary.is_passing);

    let bob_summary = h
        .service
        .submit(&session.id, &bob.participant_id, &correct_selections(&h.quiz, 3))
        .await
        .unwrap();
    assert_eq!(bob_summary.accuracy, 60);
    assert!(!bob_summary.is_passing);

    let board = h.service.leaderboard(&session.id).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].display_name, "Alice");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].display_name, "Bob");
    assert_eq!(board[1].rank, 2);
}

#[tokio::test]
async fn double_submission_is_rejected_but_first_result_stands() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    h.service.start_session(&session.id, &h.owner).await.unwrap();

    let joined = h
        .service
        .join(join_request(&session.access_code, "Alice"), None)
        .await
        .unwrap();

    h.service
        .submit(&session.id, &joined.participant_id, &correct_selections(&h.quiz, 5))
        .await
        .unwrap();

    let err = h
        .service
        .submit(&session.id, &joined.participant_id, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let board = h.service.leaderboard(&session.id).await.unwrap();
    assert_eq!(board[0].score, 5);
}

#[tokio::test]
async fn malformed_and_unknown_codes_get_the_same_rejection() {
    let h = harness().await;

    for code in ["AB10XZ", "short", "ZZZZZZ"] {
        let err = h
            .service
            .join(join_request(code, "Guest"), None)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, AppError::InvalidState(msg) if msg == INVALID_ACCESS_CODE_MSG),
            "code {:?} leaked a different error: {}",
            code,
            err
        );
    }
}

#[tokio::test]
async fn join_is_case_insensitive_and_trimmed() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    h.service.start_session(&session.id, &h.owner).await.unwrap();

    let sloppy = format!("  {}  ", session.access_code.to_lowercase());
    let joined = h.service.join(join_request(&sloppy, "Guest"), None).await;

    assert!(joined.is_ok());
}

#[tokio::test]
async fn authenticated_rejoin_reuses_the_participant_record() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    h.service.start_session(&session.id, &h.owner).await.unwrap();

    let first = h
        .service
        .join(join_request(&session.access_code, "Alice"), Some("user-9"))
        .await
        .unwrap();
    let second = h
        .service
        .join(join_request(&session.access_code, "Alice again"), Some("user-9"))
        .await
        .unwrap();

    assert_eq!(first.participant_id, second.participant_id);
}

#[tokio::test]
async fn ending_a_session_blocks_new_joins_and_frees_the_code() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    h.service.start_session(&session.id, &h.owner).await.unwrap();
    h.service.end_session(&session.id, &h.owner).await.unwrap();

    // Ending again is a harmless no-op.
    let ended = h.service.end_session(&session.id, &h.owner).await.unwrap();
    assert_eq!(ended.status, SessionStatus::Completed);

    let err = h
        .service
        .join(join_request(&session.access_code, "Latecomer"), None)
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::InvalidState(msg) if msg == INVALID_ACCESS_CODE_MSG));

    // The completed session no longer holds its code: a new session may
    // receive the same one without tripping the uniqueness check.
    let mut recycled = QuizSession::new(&h.quiz.id, "host-1", "Recycled", None, 30);
    recycled.access_code = session.access_code.clone();
    assert!(h.sessions.create(recycled).await.is_ok());
}

#[tokio::test]
async fn only_the_owner_or_an_admin_can_drive_the_lifecycle() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();

    let stranger = claims("stranger", UserRole::User);
    let err = h
        .service
        .start_session(&session.id, &stranger)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let admin = claims("root", UserRole::Admin);
    h.service.start_session(&session.id, &admin).await.unwrap();
    h.service.end_session(&session.id, &admin).await.unwrap();
}

#[tokio::test]
async fn expiry_sweep_completes_overdue_sessions() {
    let h = harness().await;

    let session = h
        .service
        .create_session(session_request(&h.quiz.id), "host-1")
        .await
        .unwrap();
    h.service.start_session(&session.id, &h.owner).await.unwrap();

    // Backdate the start so the deadline has passed.
    {
        let mut stored = h.sessions.find_by_id(&session.id).await.unwrap().unwrap();
        stored.start_time = Some(Utc::now() - chrono::Duration::minutes(31));
        h.sessions.update(stored).await.unwrap();
    }

    let repo: Arc<dyn SessionRepository> = h.sessions.clone();
    let ended = SessionWorker::sweep(&repo).await.unwrap();
    assert_eq!(ended, 1);

    let stored = h.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Completed);
}

#[tokio::test]
async fn deleting_a_quiz_removes_its_questions_with_it() {
    let h = harness().await;

    assert!(h.quizzes.delete(&h.quiz.id).await.unwrap());
    assert!(h.quizzes.find_by_id(&h.quiz.id).await.unwrap().is_none());
}
