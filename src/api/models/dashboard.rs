use serde::{Deserialize, Serialize};

/// `GET /dashboard/data`; every aggregate is computed server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub phase_costs: Vec<PhaseCost>,
    #[serde(default)]
    pub costly_operations: Vec<CostlyOperation>,
    #[serde(default)]
    pub total_phases_cost: TotalPhasesCost,
    #[serde(default)]
    pub overruns: Overruns,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCost {
    #[serde(default)]
    pub phase_number: Option<u32>,
    #[serde(default)]
    pub planned_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostlyOperation {
    #[serde(default)]
    pub operation_type: String,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub operation_count: u64,
    #[serde(default)]
    pub overrun_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPhasesCost {
    #[serde(default)]
    pub total_actual_cost: f64,
    #[serde(default)]
    pub total_planned_cost: f64,
    #[serde(default)]
    pub cost_overrun: f64,
    #[serde(default)]
    pub total_phases: u64,
    #[serde(default)]
    pub cost_overrun_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overruns {
    #[serde(default)]
    pub time_overruns: u64,
    #[serde(default)]
    pub cost_overruns: u64,
    #[serde(default)]
    pub total_phases: u64,
    #[serde(default)]
    pub total_time_overrun_days: f64,
    #[serde(default)]
    pub total_cost_overrun: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_payload_defaults() {
        let data: DashboardData = serde_json::from_value(json!({
            "phaseCosts": [{"phaseNumber": 1, "plannedCost": 100.0}],
            "overruns": {"timeOverruns": 2, "totalPhases": 4}
        }))
        .unwrap();

        assert_eq!(data.phase_costs[0].actual_cost, 0.0);
        assert!(data.costly_operations.is_empty());
        assert_eq!(data.total_phases_cost, TotalPhasesCost::default());
        assert_eq!(data.overruns.time_overruns, 2);
    }
}
