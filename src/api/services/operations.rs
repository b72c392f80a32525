use crate::api::client::ForageClient;
use crate::api::constants::{child_path, endpoints, record_path};
use crate::api::error::ApiError;
use crate::api::models::{Operation, OperationPayload};

pub struct OperationService<'a> {
    pub(super) client: &'a ForageClient,
}

impl OperationService<'_> {
    pub async fn by_phase(&self, phase_id: i64) -> Result<Vec<Operation>, ApiError> {
        self.client
            .get(&child_path(endpoints::OPERATIONS, "phase", phase_id))
            .await
    }

    pub async fn by_forage(&self, forage_id: i64) -> Result<Vec<Operation>, ApiError> {
        self.client
            .get(&child_path(endpoints::OPERATIONS, "forage", forage_id))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Operation, ApiError> {
        self.client.get(&record_path(endpoints::OPERATIONS, id)).await
    }

    pub async fn create(&self, payload: &OperationPayload) -> Result<Operation, ApiError> {
        self.client.post(endpoints::OPERATIONS, payload).await
    }

    pub async fn update(&self, id: i64, payload: &OperationPayload) -> Result<Operation, ApiError> {
        self.client
            .put(&record_path(endpoints::OPERATIONS, id), payload)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&record_path(endpoints::OPERATIONS, id))
            .await
    }
}
