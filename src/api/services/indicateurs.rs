use crate::api::client::ForageClient;
use crate::api::constants::endpoints;
use crate::api::error::ApiError;
use crate::api::models::IndicateurPayload;
use serde_json::Value;

pub struct IndicateurService<'a> {
    pub(super) client: &'a ForageClient,
}

impl IndicateurService<'_> {
    /// The created indicator is not modelled; callers only need success
    pub async fn create(&self, payload: &IndicateurPayload) -> Result<Option<Value>, ApiError> {
        self.client.post_optional(endpoints::INDICATEURS, payload).await
    }
}
