use crate::api::client::ForageClient;
use crate::api::constants::endpoints;
use crate::api::error::ApiError;
use crate::api::models::{LoginData, LoginRequest, RegisterRequest, Utilisateur};

pub struct UtilisateurService<'a> {
    pub(super) client: &'a ForageClient,
}

impl UtilisateurService<'_> {
    pub async fn list(&self) -> Result<Vec<Utilisateur>, ApiError> {
        self.client.get(endpoints::UTILISATEURS).await
    }

    /// Registration is judged by HTTP status alone
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.client.post_accepted(endpoints::REGISTER, request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        self.client.post(endpoints::LOGIN, request).await
    }
}
