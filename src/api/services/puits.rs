use crate::api::client::ForageClient;
use crate::api::constants::{endpoints, record_path};
use crate::api::error::ApiError;
use crate::api::models::Puit;

pub struct PuitService<'a> {
    pub(super) client: &'a ForageClient,
}

impl PuitService<'_> {
    pub async fn list(&self) -> Result<Vec<Puit>, ApiError> {
        self.client.get(endpoints::PUITS).await
    }

    pub async fn get(&self, id: i64) -> Result<Puit, ApiError> {
        self.client.get(&record_path(endpoints::PUITS, id)).await
    }
}
