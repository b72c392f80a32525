use super::dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puit {
    pub id: i64,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub coord_x: Option<f64>,
    #[serde(default)]
    pub coord_y: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Puit {
    pub fn display_name(&self) -> String {
        self.nom
            .clone()
            .unwrap_or_else(|| format!("Well #{}", self.id))
    }
}

/// A drilling campaign on a well.
///
/// Sent back whole on update, so fields this crate does not model survive in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forage {
    pub id: i64,
    #[serde(default)]
    pub cout: Option<f64>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_debut: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub date_fin: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Forage {
    pub fn cost(&self) -> f64 {
        self.cout.unwrap_or(0.0)
    }
}
