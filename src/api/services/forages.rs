use crate::api::client::ForageClient;
use crate::api::constants::{child_path, endpoints, record_path};
use crate::api::error::ApiError;
use crate::api::models::Forage;

pub struct ForageService<'a> {
    pub(super) client: &'a ForageClient,
}

impl ForageService<'_> {
    pub async fn by_puit(&self, puit_id: i64) -> Result<Vec<Forage>, ApiError> {
        self.client
            .get(&child_path(endpoints::FORAGES, "puit", puit_id))
            .await
    }

    /// A well has at most one active forage: the first one listed
    pub async fn active_for_puit(&self, puit_id: i64) -> Result<Option<Forage>, ApiError> {
        Ok(self.by_puit(puit_id).await?.into_iter().next())
    }

    /// Rewrites the whole forage, unknown fields included
    pub async fn update(&self, forage: &Forage) -> Result<Forage, ApiError> {
        self.client
            .put(&record_path(endpoints::FORAGES, forage.id), forage)
            .await
    }
}
