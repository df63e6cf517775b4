use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{
        session::{generate_access_code, is_valid_access_code},
        QuizSession, SessionParticipant, SessionStatus,
    },
    models::dto::{
        request::{AnswerSelection, CreateSessionRequest, JoinSessionRequest},
        response::{JoinSessionResponse, QuestionView, ScoreSummary, SessionView},
    },
    repositories::{ParticipantRepository, QuizRepository, SessionRepository},
    services::{leaderboard, scoring},
};

/// Bounded retry for access-code collisions; the unique index is the
/// authority, the service just picks a new code and tries again.
const CODE_GENERATION_ATTEMPTS: usize = 5;

pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    participants: Arc<dyn ParticipantRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        participants: Arc<dyn ParticipantRepository>,
        quizzes: Arc<dyn QuizRepository>,
    ) -> Self {
        Self {
            sessions,
            participants,
            quizzes,
        }
    }

    pub async fn create_session(
        &self,
        request: CreateSessionRequest,
        owner_id: &str,
    ) -> AppResult<QuizSession> {
        self.quizzes
            .find_by_id(&request.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", request.quiz_id))
            })?;

        let mut session = QuizSession::new(
            &request.quiz_id,
            owner_id,
            &request.title,
            request.description.clone(),
            request.duration_minutes,
        );

        for attempt in 0.. {
            match self.sessions.create(session.clone()).await {
                Ok(created) => return Ok(created),
                Err(AppError::AlreadyExists(_)) if attempt + 1 < CODE_GENERATION_ATTEMPTS => {
                    log::warn!(
                        "Access code collision on '{}', regenerating",
                        session.access_code
                    );
                    session.access_code = generate_access_code();
                }
                Err(err) => return Err(err),
            }
        }
        unreachable!("bounded retry loop always returns");
    }

    pub async fn get_session(&self, id: &str) -> AppResult<QuizSession> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    pub async fn start_session(&self, id: &str, claims: &Claims) -> AppResult<QuizSession> {
        let mut session = self.get_session(id).await?;
        crate::auth::require_owner_or_admin(claims, &session.created_by_user_id)?;

        session.start(Utc::now())?;
        let session = self.sessions.update(session).await?;
        log::info!("Session {} started", session.id);
        Ok(session)
    }

    /// Ends an active session. Ending an already-completed session is a
    /// no-op; it never blocks in-flight participant submissions.
    pub async fn end_session(&self, id: &str, claims: &Claims) -> AppResult<QuizSession> {
        let mut session = self.get_session(id).await?;
        crate::auth::require_owner_or_admin(claims, &session.created_by_user_id)?;

        if session.end(Utc::now())? {
            session = self.sessions.update(session).await?;
            log::info!("Session {} ended", session.id);
        }
        Ok(session)
    }

    /// Redeems an access code. Every failure path returns the same generic
    /// rejection so the endpoint cannot be used to probe for live codes;
    /// the internal cause is only logged.
    pub async fn join(
        &self,
        request: JoinSessionRequest,
        user_id: Option<&str>,
    ) -> AppResult<JoinSessionResponse> {
        let code = request.access_code.trim().to_uppercase();

        if !is_valid_access_code(&code) {
            log::debug!("Join rejected: malformed access code");
            return Err(AppError::invalid_access_code());
        }

        let session = match self.sessions.find_by_access_code(&code).await? {
            Some(session) => session,
            None => {
                log::debug!("Join rejected: no live session for code");
                return Err(AppError::invalid_access_code());
            }
        };

        if session.status != SessionStatus::Active {
            log::debug!(
                "Join rejected: session {} is '{}', not active",
                session.id,
                session.status.as_str()
            );
            return Err(AppError::invalid_access_code());
        }

        let participant = match user_id {
            // Idempotent join: an authenticated user keeps their record.
            Some(uid) => match self
                .participants
                .find_by_session_and_user(&session.id, uid)
                .await?
            {
                Some(existing) => existing,
                None => {
                    self.participants
                        .create(SessionParticipant::new(
                            &session.id,
                            &request.display_name,
                            Some(uid),
                        ))
                        .await?
                }
            },
            None => {
                self.participants
                    .create(SessionParticipant::new(&session.id, &request.display_name, None))
                    .await?
            }
        };

        let quiz = self
            .quizzes
            .find_by_id(&session.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz for session not found".to_string()))?;

        let now = Utc::now();
        Ok(JoinSessionResponse {
            participant_id: participant.id,
            session: SessionView::from_session(&session, now),
            questions: quiz.questions.iter().map(QuestionView::from).collect(),
        })
    }

    /// Terminal submission for one participant. Independent of whether the
    /// session itself has completed in the meantime; a second submission is
    /// rejected rather than re-scored.
    pub async fn submit(
        &self,
        session_id: &str,
        participant_id: &str,
        selections: &[AnswerSelection],
    ) -> AppResult<ScoreSummary> {
        let session = self.get_session(session_id).await?;

        let mut participant = self
            .participants
            .find_by_id(participant_id)
            .await?
            .filter(|p| p.session_id == session.id)
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;

        if participant.completed {
            return Err(AppError::InvalidState(
                "Answers have already been submitted".to_string(),
            ));
        }

        if session.status == SessionStatus::Pending {
            return Err(AppError::InvalidState(
                "Session has not been started".to_string(),
            ));
        }

        let quiz = self
            .quizzes
            .find_by_id(&session.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz for session not found".to_string()))?;

        let result = scoring::score_selections(&quiz.questions, selections);
        participant.complete(result.score, result.max_score, Utc::now());
        let participant = self.participants.update(participant).await?;

        Ok(ScoreSummary::new(
            participant.score,
            participant.max_score,
            participant.time_taken_seconds,
        ))
    }

    pub async fn leaderboard(
        &self,
        session_id: &str,
    ) -> AppResult<Vec<crate::models::dto::response::LeaderboardEntry>> {
        let session = self.get_session(session_id).await?;
        let participants = self.participants.list_by_session(&session.id).await?;
        Ok(leaderboard::rank_participants(&participants))
    }
}

/// One-shot guard for the countdown-driven auto-submit: the threshold side
/// effect must fire exactly once, even though the poll keeps running.
#[derive(Debug, Default)]
pub struct AutoSubmitGuard {
    fired: bool,
}

impl AutoSubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once: the first poll where remaining time has
    /// reached zero and the participant has not already completed.
    pub fn poll(&mut self, remaining_seconds: i64, already_completed: bool) -> bool {
        if self.fired || already_completed || remaining_seconds > 0 {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
