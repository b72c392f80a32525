use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemeType {
    Cout,
    Delai,
    Equipement,
    Technique,
    Securite,
    Environnement,
}

impl ProblemeType {
    pub fn label(self) -> &'static str {
        match self {
            ProblemeType::Cout => "Cost Overrun",
            ProblemeType::Delai => "Delay",
            ProblemeType::Equipement => "Equipment",
            ProblemeType::Technique => "Technical",
            ProblemeType::Securite => "Safety",
            ProblemeType::Environnement => "Environmental",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ProblemeType::Cout => "COUT",
            ProblemeType::Delai => "DELAI",
            ProblemeType::Equipement => "EQUIPEMENT",
            ProblemeType::Technique => "TECHNIQUE",
            ProblemeType::Securite => "SECURITE",
            ProblemeType::Environnement => "ENVIRONNEMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gravite {
    Critique,
    Majeur,
    Mineur,
}

impl Gravite {
    pub fn label(self) -> &'static str {
        match self {
            Gravite::Critique => "Critical",
            Gravite::Majeur => "Major",
            Gravite::Mineur => "Minor",
        }
    }

    /// Accepts the wire code or the English label, any case
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CRITIQUE" | "CRITICAL" => Some(Gravite::Critique),
            "MAJEUR" | "MAJOR" => Some(Gravite::Majeur),
            "MINEUR" | "MINOR" => Some(Gravite::Mineur),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemeStatut {
    Ouvert,
    EnCours,
    Resolu,
    Ferme,
}

impl ProblemeStatut {
    pub fn label(self) -> &'static str {
        match self {
            ProblemeStatut::Ouvert => "Open",
            ProblemeStatut::EnCours => "In Progress",
            ProblemeStatut::Resolu => "Resolved",
            ProblemeStatut::Ferme => "Closed",
        }
    }

    /// Resolved and closed alerts carry a resolution date and resolver
    pub fn is_settled(self) -> bool {
        matches!(self, ProblemeStatut::Resolu | ProblemeStatut::Ferme)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "OUVERT" | "OPEN" => Some(ProblemeStatut::Ouvert),
            "EN_COURS" | "IN_PROGRESS" => Some(ProblemeStatut::EnCours),
            "RESOLU" | "RESOLVED" => Some(ProblemeStatut::Resolu),
            "FERME" | "CLOSED" => Some(ProblemeStatut::Ferme),
            _ => None,
        }
    }
}

/// An alert raised by the backend's problem detection.
///
/// Updates send the whole record back, so everything not modelled here is
/// kept in `extra`; nested records stay raw JSON for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probleme {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<ProblemeType>,
    #[serde(default)]
    pub gravite: Option<Gravite>,
    #[serde(default)]
    pub statut: Option<ProblemeStatut>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_detection: Option<String>,
    #[serde(default)]
    pub date_resolution: Option<String>,
    #[serde(default)]
    pub impact_cout: Option<f64>,
    #[serde(default)]
    pub impact_delai: Option<f64>,
    #[serde(default)]
    pub operation: Option<Value>,
    #[serde(default)]
    pub signale_par: Option<Value>,
    #[serde(default)]
    pub resolu_par: Option<Value>,
    #[serde(default)]
    pub solution_propose: Option<String>,
    #[serde(default)]
    pub solution_implemente: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Probleme {
    pub fn type_label(&self) -> &'static str {
        self.kind.map(ProblemeType::label).unwrap_or("Unknown")
    }

    /// `operation.phase.forage.puit.nom`
    pub fn well_name(&self) -> Option<&str> {
        self.operation
            .as_ref()?
            .pointer("/phase/forage/puit/nom")?
            .as_str()
    }

    pub fn operation_label(&self) -> Option<String> {
        let operation = self.operation.as_ref()?;
        operation
            .pointer("/typeOperation/nom")
            .or_else(|| operation.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| operation.get("id").map(|id| format!("Operation #{}", id)))
    }

    /// Person who raised or resolved the alert, as `prenom nom`
    pub fn person_name(person: &Option<Value>) -> Option<String> {
        let person = person.as_ref()?;
        let first = person.get("prenom").and_then(Value::as_str).unwrap_or("");
        let last = person.get("nom").and_then(Value::as_str).unwrap_or("");
        let full = format!("{} {}", first, last).trim().to_string();
        if full.is_empty() {
            person.get("id").map(|id| format!("User #{}", id))
        } else {
            Some(full)
        }
    }
}

/// Body for `POST /problemes/detect`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetectionRequest {
    pub daily_report_id: i64,
    pub updated_operation_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Probleme {
        serde_json::from_value(json!({
            "id": 12,
            "type": "COUT",
            "gravite": "MAJEUR",
            "statut": "OUVERT",
            "description": "Cost above plan",
            "dateDetection": "2024-05-04T10:00:00",
            "operation": {
                "id": 40,
                "typeOperation": {"code": "CIM", "nom": "Cimentation"},
                "phase": {"id": 7, "forage": {"id": 3, "puit": {"id": 2, "nom": "HMD-12"}}}
            },
            "signalePar": {"id": 5, "nom": "Benali", "prenom": "Amine"},
            "seuilDepasse": 15.5
        }))
        .unwrap()
    }

    #[test]
    fn test_nested_lookups() {
        let alert = sample();
        assert_eq!(alert.type_label(), "Cost Overrun");
        assert_eq!(alert.well_name(), Some("HMD-12"));
        assert_eq!(alert.operation_label().as_deref(), Some("Cimentation"));
        assert_eq!(Probleme::person_name(&alert.signale_par).as_deref(), Some("Amine Benali"));
        assert_eq!(Probleme::person_name(&alert.resolu_par), None);
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], "COUT");
        assert_eq!(value["seuilDepasse"], 15.5);
        assert_eq!(value["operation"]["phase"]["forage"]["puit"]["nom"], "HMD-12");
    }

    #[test]
    fn test_parsers() {
        assert_eq!(Gravite::parse("critical"), Some(Gravite::Critique));
        assert_eq!(Gravite::parse("MINEUR"), Some(Gravite::Mineur));
        assert_eq!(ProblemeStatut::parse("en_cours"), Some(ProblemeStatut::EnCours));
        assert_eq!(ProblemeStatut::parse("In Progress"), Some(ProblemeStatut::EnCours));
        assert_eq!(ProblemeStatut::parse("done"), None);
        assert!(ProblemeStatut::Ferme.is_settled());
        assert!(!ProblemeStatut::EnCours.is_settled());
    }
}
