use crate::api::client::ForageClient;
use crate::api::constants::{child_path, endpoints, record_path};
use crate::api::error::ApiError;
use crate::api::models::{Phase, PhasePayload};

pub struct PhaseService<'a> {
    pub(super) client: &'a ForageClient,
}

impl PhaseService<'_> {
    pub async fn by_forage(&self, forage_id: i64) -> Result<Vec<Phase>, ApiError> {
        self.client
            .get(&child_path(endpoints::PHASES, "forage", forage_id))
            .await
    }

    pub async fn create(&self, payload: &PhasePayload) -> Result<Phase, ApiError> {
        self.client.post(endpoints::PHASES, payload).await
    }

    pub async fn update(&self, id: i64, payload: &PhasePayload) -> Result<Phase, ApiError> {
        self.client
            .put(&record_path(endpoints::PHASES, id), payload)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&record_path(endpoints::PHASES, id)).await
    }
}
