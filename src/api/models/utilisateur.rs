use serde::{Deserialize, Serialize};

/// A console user.
///
/// `role` stays a plain string: the backend mixes its enum codes
/// (`INGENIEUR_FORAGE`, ...) with the lower-case roles chosen at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utilisateur {
    pub id: i64,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Utilisateur {
    pub fn full_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.prenom.as_deref().unwrap_or(""),
            self.nom.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            format!("User #{}", self.id)
        } else {
            full.to_string()
        }
    }

    pub fn role_label(&self) -> String {
        match self.role.as_deref() {
            Some(role) => Role::label_for(role),
            None => "-".to_string(),
        }
    }
}

/// Roles known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    IngenieurForage,
    ResponsableChantier,
    Geologue,
    ChefEquipe,
    Superviseur,
    Admin,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::IngenieurForage => "Drilling Engineer",
            Role::ResponsableChantier => "Site Manager",
            Role::Geologue => "Geologist",
            Role::ChefEquipe => "Team Leader",
            Role::Superviseur => "Supervisor",
            Role::Admin => "Administrator",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INGENIEUR_FORAGE" => Some(Role::IngenieurForage),
            "RESPONSABLE_CHANTIER" => Some(Role::ResponsableChantier),
            "GEOLOGUE" => Some(Role::Geologue),
            "CHEF_EQUIPE" => Some(Role::ChefEquipe),
            "SUPERVISEUR" => Some(Role::Superviseur),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// English label for a known code, the raw value otherwise
    pub fn label_for(raw: &str) -> String {
        Self::from_code(raw)
            .map(|role| role.label().to_string())
            .unwrap_or_else(|| raw.to_string())
    }
}

/// Roles offered when registering a user; sent lower-cased
pub const REGISTRATION_ROLES: [&str; 5] = ["Engineer", "Manager", "Viewer", "Admin", "Supervisor"];

/// Body for `POST /utilisateurs/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Body for `POST /utilisateurs/login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: Utilisateur,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::label_for("GEOLOGUE"), "Geologist");
        assert_eq!(Role::label_for("engineer"), "engineer");
    }

    #[test]
    fn test_full_name() {
        let user: Utilisateur = serde_json::from_value(json!({
            "id": 3, "nom": "Benali", "prenom": "Amine", "role": "INGENIEUR_FORAGE"
        }))
        .unwrap();
        assert_eq!(user.full_name(), "Amine Benali");
        assert_eq!(user.role_label(), "Drilling Engineer");

        let anonymous: Utilisateur = serde_json::from_value(json!({"id": 4})).unwrap();
        assert_eq!(anonymous.full_name(), "User #4");
        assert_eq!(anonymous.role_label(), "-");
    }
}
