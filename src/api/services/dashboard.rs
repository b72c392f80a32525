use crate::api::client::ForageClient;
use crate::api::constants::endpoints;
use crate::api::error::ApiError;
use crate::api::models::DashboardData;

pub struct DashboardService<'a> {
    pub(super) client: &'a ForageClient,
}

impl DashboardService<'_> {
    pub async fn data(&self) -> Result<DashboardData, ApiError> {
        self.client.get(endpoints::DASHBOARD_DATA).await
    }
}
