use super::EntityRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatut {
    Planifie,
    EnCours,
    Termine,
    Probleme,
    Annule,
}

impl OperationStatut {
    pub fn label(self) -> &'static str {
        match self {
            OperationStatut::Planifie => "Planifié",
            OperationStatut::EnCours => "En cours",
            OperationStatut::Termine => "Terminé",
            OperationStatut::Probleme => "Problème",
            OperationStatut::Annule => "Annulé",
        }
    }

    /// Still open for work: planned or in progress
    pub fn is_active(self) -> bool {
        matches!(self, OperationStatut::Planifie | OperationStatut::EnCours)
    }
}

/// Catalogue entry an operation is typed by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TypeOperation {
    /// `{ "code": ... }`, enough for the backend to resolve the type
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            nom: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: i64,
    #[serde(default)]
    pub phase: Option<EntityRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub type_operation: Option<TypeOperation>,
    #[serde(default)]
    pub cout_prev: Option<f64>,
    #[serde(default)]
    pub cout_reel: Option<f64>,
    #[serde(default)]
    pub statut: Option<OperationStatut>,
    #[serde(default)]
    pub daily_report: Option<EntityRef>,
    #[serde(default)]
    pub created_by: Option<EntityRef>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Operation {
    /// Type name, else description, else a placeholder
    pub fn name(&self) -> String {
        self.type_operation
            .as_ref()
            .and_then(|t| t.nom.clone())
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.description.clone().filter(|d| !d.trim().is_empty()))
            .unwrap_or_else(|| "Unknown Operation".to_string())
    }

    pub fn type_code(&self) -> Option<&str> {
        self.type_operation.as_ref().and_then(|t| t.code.as_deref())
    }

    pub fn is_active(&self) -> bool {
        self.statut.is_some_and(OperationStatut::is_active)
    }
}

/// Body for `POST /operations` and `PUT /operations/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub phase: EntityRef,
    pub description: Option<String>,
    pub type_operation: Option<TypeOperation>,
    pub cout_prev: Option<f64>,
    pub cout_reel: Option<f64>,
    pub statut: OperationStatut,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_report: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<EntityRef>,
}
