use crate::api::models::Utilisateur;
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A signed-in user and the bearer token the backend issued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Utilisateur,
    /// API the token was issued by
    pub api_url: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Reads and writes `session.toml`
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.toml` next to `config.toml`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("session.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            debug!("No session file at {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {:?}", self.path))?;
        let session: Session = toml::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", self.path))?;
        debug!("Loaded session for user {}", session.user.id);
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let content = toml::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        info!("Session saved for user {}", session.user.id);
        Ok(())
    }

    /// Returns whether a session existed
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session file: {:?}", self.path))?;
        info!("Session cleared");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Session {
        Session {
            token: "jwt-abc".into(),
            user: Utilisateur {
                id: 7,
                nom: Some("Haddad".into()),
                prenom: Some("Sofia".into()),
                email: Some("s.haddad@example.com".into()),
                role: Some("engineer".into()),
            },
            api_url: "http://localhost:8080/api".into(),
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.toml"));

        assert_eq!(store.load().unwrap(), None);

        let session = sample();
        store.save(&session).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "jwt-abc");
        assert_eq!(loaded.user_id(), 7);
        assert_eq!(loaded.user.full_name(), "Sofia Haddad");

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_user_without_optional_fields() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.toml"));

        let mut session = sample();
        session.user.email = None;
        session.user.role = None;
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user.email, None);
        assert_eq!(loaded.user.role, None);
    }
}
