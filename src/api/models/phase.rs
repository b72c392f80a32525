use super::{EntityRef, dates};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bit diameter of a phase. Each of the four phase slots has a fixed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diametre {
    #[serde(rename = "POUCES_26")]
    Pouces26,
    #[serde(rename = "POUCES_16")]
    Pouces16,
    #[serde(rename = "POUCES_12_25")]
    Pouces12_25,
    #[serde(rename = "POUCES_8_5")]
    Pouces8_5,
}

impl Diametre {
    pub const ALL: [Diametre; 4] = [
        Diametre::Pouces26,
        Diametre::Pouces16,
        Diametre::Pouces12_25,
        Diametre::Pouces8_5,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Diametre::Pouces26 => "26\"",
            Diametre::Pouces16 => "16\"",
            Diametre::Pouces12_25 => "12 1/4\"",
            Diametre::Pouces8_5 => "8 1/2\"",
        }
    }

    /// Diameter of phase `number` (1-based)
    pub fn for_phase_number(number: u32) -> Option<Self> {
        match number {
            1..=4 => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }

    pub fn phase_number(self) -> u32 {
        match self {
            Diametre::Pouces26 => 1,
            Diametre::Pouces16 => 2,
            Diametre::Pouces12_25 => 3,
            Diametre::Pouces8_5 => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: i64,
    #[serde(default)]
    pub forage: Option<EntityRef>,
    #[serde(default)]
    pub numero_phase: Option<u32>,
    #[serde(default)]
    pub diametre: Option<Diametre>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_debut_prevue: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_fin_prevue: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_debut_reelle: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_fin_reelle: Option<NaiveDate>,
    #[serde(default)]
    pub profondeur_prevue: Option<f64>,
    #[serde(default)]
    pub profondeur_reelle: Option<f64>,
}

impl Phase {
    /// A phase with a real end date takes no more daily reports
    pub fn is_completed(&self) -> bool {
        self.date_fin_reelle.is_some()
    }

    /// `Phase 2 - 16"`
    pub fn label(&self) -> String {
        let number = self
            .numero_phase
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.diametre {
            Some(diametre) => format!("Phase {} - {}", number, diametre.label()),
            None => format!("Phase {}", number),
        }
    }
}

/// Body for `POST /phases` and `PUT /phases/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub forage: EntityRef,
    pub numero_phase: u32,
    pub diametre: Diametre,
    pub description: Option<String>,
    pub date_debut_prevue: Option<NaiveDate>,
    pub date_fin_prevue: Option<NaiveDate>,
    pub date_debut_reelle: Option<NaiveDate>,
    pub date_fin_reelle: Option<NaiveDate>,
    pub profondeur_prevue: Option<f64>,
    pub profondeur_reelle: Option<f64>,
}

impl PhasePayload {
    /// Payload that rewrites `phase` unchanged
    pub fn from_phase(phase: &Phase, forage_id: i64) -> Self {
        let numero_phase = phase
            .numero_phase
            .or_else(|| phase.diametre.map(Diametre::phase_number))
            .unwrap_or(1);
        Self {
            id: Some(phase.id),
            forage: phase.forage.unwrap_or(EntityRef::new(forage_id)),
            numero_phase,
            diametre: phase
                .diametre
                .or_else(|| Diametre::for_phase_number(numero_phase))
                .unwrap_or(Diametre::Pouces26),
            description: phase.description.clone(),
            date_debut_prevue: phase.date_debut_prevue,
            date_fin_prevue: phase.date_fin_prevue,
            date_debut_reelle: phase.date_debut_reelle,
            date_fin_reelle: phase.date_fin_reelle,
            profondeur_prevue: phase.profondeur_prevue,
            profondeur_reelle: phase.profondeur_reelle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slots() {
        for (i, diametre) in Diametre::ALL.iter().enumerate() {
            let number = i as u32 + 1;
            assert_eq!(Diametre::for_phase_number(number), Some(*diametre));
            assert_eq!(diametre.phase_number(), number);
        }
        assert_eq!(Diametre::for_phase_number(0), None);
        assert_eq!(Diametre::for_phase_number(5), None);
        assert_eq!(Diametre::Pouces12_25.label(), "12 1/4\"");
    }

    #[test]
    fn test_phase_decodes_backend_shape() {
        let phase: Phase = serde_json::from_value(json!({
            "id": 11,
            "forage": {"id": 3, "cout": 10.0},
            "numeroPhase": 3,
            "diametre": "POUCES_12_25",
            "dateDebutPrevue": "2024-02-01",
            "dateFinPrevue": "2024-02-20T00:00:00",
            "profondeurPrevue": 2500.0
        }))
        .unwrap();

        assert_eq!(phase.forage, Some(EntityRef::new(3)));
        assert_eq!(phase.diametre, Some(Diametre::Pouces12_25));
        assert_eq!(phase.date_fin_prevue, NaiveDate::from_ymd_opt(2024, 2, 20));
        assert_eq!(phase.label(), "Phase 3 - 12 1/4\"");
    }

    #[test]
    fn test_payload_wire_names() {
        let phase: Phase = serde_json::from_value(json!({"id": 1, "numeroPhase": 2})).unwrap();
        let payload = PhasePayload::from_phase(&phase, 8);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["forage"]["id"], 8);
        assert_eq!(value["numeroPhase"], 2);
        assert_eq!(value["diametre"], "POUCES_16");
        assert!(value["profondeurReelle"].is_null());
    }
}
