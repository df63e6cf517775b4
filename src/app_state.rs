use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoParticipantRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoRefreshTokenRepository, MongoSessionRepository, MongoUserRepository,
        SessionRepository,
    },
    services::{
        GenerationService, QuizAttemptService, QuizService, SessionService, SourceService,
        UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt_service: Arc<JwtService>,
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub generation_service: Arc<GenerationService>,
    pub session_service: Arc<SessionService>,
    pub attempt_service: Arc<QuizAttemptService>,
    /// Kept for the background expiry worker.
    pub session_repository: Arc<dyn SessionRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        log::info!("Using database '{}'", db.db_name());

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let refresh_token_repository = Arc::new(MongoRefreshTokenRepository::new(&db));
        refresh_token_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let session_repository = Arc::new(MongoSessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let participant_repository = Arc::new(MongoParticipantRepository::new(&db));
        participant_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_expiration_hours,
        ));

        let user_service = Arc::new(UserService::new(
            user_repository,
            refresh_token_repository,
            Arc::clone(&jwt_service),
        ));
        let quiz_service = Arc::new(QuizService::new(quiz_repository.clone()));
        let generation_service = Arc::new(GenerationService::new(
            &config,
            quiz_repository.clone(),
            SourceService::new(config.max_source_chars),
        ));
        let session_service = Arc::new(SessionService::new(
            session_repository.clone(),
            participant_repository,
            quiz_repository.clone(),
        ));
        let attempt_service = Arc::new(QuizAttemptService::new(
            attempt_repository,
            quiz_repository,
        ));

        Ok(Self {
            db,
            jwt_service,
            user_service,
            quiz_service,
            generation_service,
            session_service,
            attempt_service,
            session_repository,
            config: Arc::new(config),
        })
    }
}
