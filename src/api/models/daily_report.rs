use super::{EntityRef, Phase, dates};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: i64,
    #[serde(default)]
    pub report_name: Option<String>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub concerned_well: Option<EntityRef>,
    #[serde(default)]
    pub current_phase: Option<EntityRef>,
    #[serde(default)]
    pub current_depth: Option<f64>,
    #[serde(default)]
    pub lithology: Option<String>,
    #[serde(default)]
    pub daily_cost: Option<f64>,
}

/// Body for `POST /daily-reports`; the current phase is sent whole
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportPayload {
    pub report_name: String,
    pub report_date: NaiveDate,
    pub concerned_well: EntityRef,
    pub current_phase: Phase,
    pub current_depth: f64,
    pub lithology: Option<String>,
    pub daily_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_with_embedded_phase() {
        let report: DailyReport = serde_json::from_value(json!({
            "id": 31,
            "reportName": "Day 4",
            "reportDate": "2024-05-04",
            "concernedWell": {"id": 2, "nom": "HMD-12"},
            "currentPhase": {"id": 7, "numeroPhase": 1, "diametre": "POUCES_26"},
            "dailyCost": 12000.5
        }))
        .unwrap();

        assert_eq!(report.current_phase, Some(EntityRef::new(7)));
        assert_eq!(report.concerned_well, Some(EntityRef::new(2)));
        assert_eq!(report.current_depth, None);
    }
}
