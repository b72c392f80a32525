use crate::api::client::ForageClient;
use crate::api::constants::endpoints;
use crate::api::error::ApiError;
use crate::api::models::{DailyReport, DailyReportPayload};

pub struct DailyReportService<'a> {
    pub(super) client: &'a ForageClient,
}

impl DailyReportService<'_> {
    pub async fn for_puit(&self, puit_id: i64) -> Result<Vec<DailyReport>, ApiError> {
        self.client
            .get_query(endpoints::DAILY_REPORTS, &[("puitId", puit_id.to_string())])
            .await
    }

    pub async fn create(&self, payload: &DailyReportPayload) -> Result<DailyReport, ApiError> {
        self.client.post(endpoints::DAILY_REPORTS, payload).await
    }
}
