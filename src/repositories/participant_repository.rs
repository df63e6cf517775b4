use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::SessionParticipant};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn create(&self, participant: SessionParticipant) -> AppResult<SessionParticipant>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionParticipant>>;
    async fn find_by_session_and_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Option<SessionParticipant>>;
    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<SessionParticipant>>;
    async fn update(&self, participant: SessionParticipant) -> AppResult<SessionParticipant>;
}

pub struct MongoParticipantRepository {
    collection: Collection<SessionParticipant>,
}

impl MongoParticipantRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("session_participants");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for session_participants collection");

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

        // One record per (session, authenticated user); anonymous rows have
        // no user_id and are exempt.
        let session_user_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "user_id": { "$type": "string" } })
                    .name("session_user_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(session_user_index).await?;

        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for MongoParticipantRepository {
    async fn create(&self, participant: SessionParticipant) -> AppResult<SessionParticipant> {
        self.collection.insert_one(&participant).await?;
        Ok(participant)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionParticipant>> {
        let participant = self.collection.find_one(doc! { "id": id }).await?;
        Ok(participant)
    }

    async fn find_by_session_and_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Option<SessionParticipant>> {
        let participant = self
            .collection
            .find_one(doc! { "session_id": session_id, "user_id": user_id })
            .await?;
        Ok(participant)
    }

    async fn list_by_session(&self, session_id: &str) -> AppResult<Vec<SessionParticipant>> {
        let participants = self
            .collection
            .find(doc! { "session_id": session_id })
            .await?
            .try_collect()
            .await?;
        Ok(participants)
    }

    async fn update(&self, participant: SessionParticipant) -> AppResult<SessionParticipant> {
        self.collection
            .replace_one(doc! { "id": &participant.id }, &participant)
            .await?;
        Ok(participant)
    }
}
