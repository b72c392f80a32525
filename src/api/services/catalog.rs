use crate::api::client::ForageClient;
use crate::api::constants::endpoints;
use crate::api::error::ApiError;
use crate::api::models::{TypeIndicateur, TypeOperation};

/// Operation and indicator type catalogues
pub struct CatalogService<'a> {
    pub(super) client: &'a ForageClient,
}

impl CatalogService<'_> {
    pub async fn type_operations(&self) -> Result<Vec<TypeOperation>, ApiError> {
        self.client.get(endpoints::TYPE_OPERATIONS).await
    }

    pub async fn type_indicateurs(&self) -> Result<Vec<TypeIndicateur>, ApiError> {
        self.client.get(endpoints::TYPE_INDICATEURS).await
    }
}
