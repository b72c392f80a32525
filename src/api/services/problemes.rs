use crate::api::client::ForageClient;
use crate::api::constants::{endpoints, record_path};
use crate::api::error::ApiError;
use crate::api::models::{ProblemDetectionRequest, Probleme};

pub struct ProblemeService<'a> {
    pub(super) client: &'a ForageClient,
}

impl ProblemeService<'_> {
    pub async fn list(&self) -> Result<Vec<Probleme>, ApiError> {
        self.client.get(endpoints::PROBLEMES).await
    }

    pub async fn get(&self, id: i64) -> Result<Probleme, ApiError> {
        self.client.get(&record_path(endpoints::PROBLEMES, id)).await
    }

    /// Sends the whole alert back and returns the server's version
    pub async fn update(&self, probleme: &Probleme) -> Result<Probleme, ApiError> {
        self.client
            .put(&record_path(endpoints::PROBLEMES, probleme.id), probleme)
            .await
    }

    /// Ask the backend to run its detection rules for a freshly created report
    pub async fn detect(&self, request: &ProblemDetectionRequest) -> Result<Vec<Probleme>, ApiError> {
        self.client.post(endpoints::PROBLEMES_DETECT, request).await
    }
}
