use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{QuizSession, SessionStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>>;
    /// Looks the code up among non-completed sessions only; completed
    /// sessions release their code for reuse.
    async fn find_by_access_code(&self, access_code: &str) -> AppResult<Option<QuizSession>>;
    async fn list_by_status(&self, status: SessionStatus) -> AppResult<Vec<QuizSession>>;
    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<QuizSession>>;
    async fn update(&self, session: QuizSession) -> AppResult<QuizSession>;
}

pub struct MongoSessionRepository {
    collection: Collection<QuizSession>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(id_index).await?;

        // Uniqueness only matters while a session can still be joined, so
        // the index is partial over pending/active sessions. Insertion races
        // on the same code surface as duplicate-key errors and are retried
        // by the service.
        let code_index = IndexModel::builder()
            .keys(doc! { "access_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(
                        doc! { "status": { "$in": ["pending", "active"] } },
                    )
                    .name("access_code_live_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(code_index).await?;

        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we))
            if we.code == 11000
    )
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession> {
        match self.collection.insert_one(&session).await {
            Ok(_) => Ok(session),
            Err(err) if is_duplicate_key(&err) => Err(crate::errors::AppError::AlreadyExists(
                "Access code already in use".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn find_by_access_code(&self, access_code: &str) -> AppResult<Option<QuizSession>> {
        let session = self
            .collection
            .find_one(doc! {
                "access_code": access_code,
                "status": { "$ne": "completed" },
            })
            .await?;
        Ok(session)
    }

    async fn list_by_status(&self, status: SessionStatus) -> AppResult<Vec<QuizSession>> {
        let sessions = self
            .collection
            .find(doc! { "status": status.as_str() })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<QuizSession>> {
        let sessions = self
            .collection
            .find(doc! { "created_by_user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn update(&self, session: QuizSession) -> AppResult<QuizSession> {
        self.collection
            .replace_one(doc! { "id": &session.id }, &session)
            .await?;
        Ok(session)
    }
}
