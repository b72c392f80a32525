use super::EntityRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalogue entry an indicator is typed by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeIndicateur {
    pub id: i64,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TypeIndicateur {
    pub fn display_name(&self) -> String {
        self.nom.clone().unwrap_or_else(|| format!("Indicator #{}", self.id))
    }
}

/// Body for `POST /indicateurs`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicateurPayload {
    pub operation: EntityRef,
    pub type_indicateur: TypeIndicateur,
    pub valeur_reelle: f64,
    pub commentaire: Option<String>,
    /// RFC 3339 timestamp
    pub date_mesure: String,
    pub daily_report: EntityRef,
}
