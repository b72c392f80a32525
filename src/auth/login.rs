use super::session::Session;
use crate::api::models::{LoginRequest, REGISTRATION_ROLES, RegisterRequest};
use crate::api::{ApiError, ForageClient};
use chrono::Utc;
use log::{info, warn};
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

const LOGIN_FALLBACK: &str = "Login failed. Please check your credentials.";
const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
const REGISTER_FALLBACK: &str = "Erreur lors de l'ajout de l'utilisateur";
const REGISTER_NETWORK_ERROR: &str = "Erreur de connexion au serveur";
const TEMPORARY_PASSWORD_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingCredentials,

    #[error("Veuillez remplir tous les champs obligatoires")]
    MissingUserFields,

    #[error("Unknown role '{0}'. Expected one of: Engineer, Manager, Viewer, Admin, Supervisor")]
    UnknownRole(String),

    #[error("This account is not authorized for {} role. Please contact the administrator.", .0.title())]
    WrongRole(ExpectedRole),

    #[error("{0}")]
    Failed(String),
}

/// The console a user signs in to
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExpectedRole {
    Manager,
    Engineer,
}

impl ExpectedRole {
    /// Lower-case role the backend must report for this console
    pub fn code(self) -> &'static str {
        match self {
            ExpectedRole::Manager => "manager",
            ExpectedRole::Engineer => "engineer",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ExpectedRole::Manager => "Well Operations Manager",
            ExpectedRole::Engineer => "Well Operations Engineer",
        }
    }
}

/// Sign in and check the account belongs to the chosen console
pub async fn login(
    client: &ForageClient,
    email: &str,
    password: &str,
    expected: ExpectedRole,
) -> Result<Session, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let data = client.utilisateurs().login(&request).await.map_err(|e| {
        warn!("Login failed for {}: {}", request.email, e);
        match e {
            ApiError::Transport { .. } => AuthError::Failed(NETWORK_ERROR.to_string()),
            other => AuthError::Failed(other.message_or(LOGIN_FALLBACK)),
        }
    })?;

    let role = data.user.role.as_deref().unwrap_or("").to_lowercase();
    if role != expected.code() {
        warn!("User {} has role '{}', expected '{}'", data.user.id, role, expected.code());
        return Err(AuthError::WrongRole(expected));
    }

    info!("User {} signed in as {}", data.user.id, expected.code());
    Ok(Session {
        token: data.token,
        user: data.user,
        api_url: client.base_url().to_string(),
        logged_in_at: Utc::now(),
    })
}

/// Fields of the add-user form
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    /// Generated when absent
    pub password: Option<String>,
}

/// Register a user and return the password the account was created with
pub async fn register_user(client: &ForageClient, user: &NewUser) -> Result<String, AuthError> {
    if [&user.first_name, &user.last_name, &user.email, &user.role]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(AuthError::MissingUserFields);
    }

    let role = normalize_role(&user.role)?;
    let password = match user.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => password.to_string(),
        None => temporary_password(),
    };

    let request = RegisterRequest {
        nom: user.last_name.trim().to_string(),
        prenom: user.first_name.trim().to_string(),
        email: user.email.trim().to_string(),
        password: password.clone(),
        role,
    };

    client.utilisateurs().register(&request).await.map_err(|e| {
        warn!("Registration of {} failed: {}", request.email, e);
        match e {
            ApiError::Transport { .. } => AuthError::Failed(REGISTER_NETWORK_ERROR.to_string()),
            other => AuthError::Failed(other.message_or(REGISTER_FALLBACK)),
        }
    })?;

    info!("Registered {} as {}", request.email, request.role);
    Ok(password)
}

/// Case-insensitive match against the registration roles, lower-cased
fn normalize_role(role: &str) -> Result<String, AuthError> {
    REGISTRATION_ROLES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(role.trim()))
        .map(|known| known.to_lowercase())
        .ok_or_else(|| AuthError::UnknownRole(role.to_string()))
}

pub fn temporary_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMPORARY_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
