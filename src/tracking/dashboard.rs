//! Figures behind the manager dashboard. Aggregates arrive precomputed from
//! `GET /dashboard/data`; only presentation math happens here.

use super::format::format_currency;
use crate::api::models::{CostlyOperation, DashboardData, Overruns, PhaseCost, TotalPhasesCost};

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCard {
    pub label: String,
    pub amount: f64,
}

/// First four phases, actual cost when known else planned
pub fn phase_cards(costs: &[PhaseCost]) -> Vec<PhaseCard> {
    costs
        .iter()
        .take(4)
        .enumerate()
        .map(|(index, cost)| PhaseCard {
            label: format!("Phase{}", cost.phase_number.unwrap_or(index as u32 + 1)),
            amount: actual_or_planned(cost.actual_cost, cost.planned_cost),
        })
        .collect()
}

pub fn total_amount(costs: &[PhaseCost]) -> f64 {
    costs
        .iter()
        .map(|c| actual_or_planned(c.actual_cost, c.planned_cost))
        .sum()
}

fn actual_or_planned(actual: f64, planned: f64) -> f64 {
    if actual != 0.0 { actual } else { planned }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsCard {
    pub amount: f64,
    pub is_actual: bool,
    pub overrun: Option<f64>,
    pub total_phases: u64,
    /// Signed percentage vs planned; `None` when exactly on plan
    pub percentage: Option<f64>,
}

impl TotalsCard {
    pub fn caption(&self) -> &'static str {
        if self.is_actual { "Actual Total" } else { "Planned Total" }
    }

    pub fn percentage_label(&self) -> Option<String> {
        self.percentage.map(|p| {
            let sign = if p > 0.0 { "+" } else { "" };
            format!("{}{:.1}% vs planned", sign, p)
        })
    }

    pub fn overrun_label(&self, unit: &str) -> Option<String> {
        self.overrun
            .map(|o| format!("+{} overrun", format_currency(o, unit)))
    }
}

pub fn totals_card(totals: &TotalPhasesCost) -> TotalsCard {
    TotalsCard {
        amount: actual_or_planned(totals.total_actual_cost, totals.total_planned_cost),
        is_actual: totals.total_actual_cost > 0.0,
        overrun: Some(totals.cost_overrun).filter(|o| *o > 0.0),
        total_phases: totals.total_phases,
        percentage: Some(totals.cost_overrun_percentage).filter(|p| *p != 0.0),
    }
}

/// One column of the compliance strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrunStep {
    pub label: &'static str,
    pub value: u64,
    pub total: u64,
    /// Share of phases affected, rounded percent
    pub top_percent: i64,
    /// Months late for delays, millions over for costs
    pub bottom_value: i64,
    pub bottom_unit: &'static str,
}

pub fn overrun_steps(overruns: &Overruns) -> [OverrunStep; 2] {
    let total = overruns.total_phases.max(1);
    let share = |count: u64| ((count as f64 / total as f64) * 100.0).round() as i64;
    [
        OverrunStep {
            label: "Dépassement de délais",
            value: overruns.time_overruns,
            total,
            top_percent: share(overruns.time_overruns),
            bottom_value: (overruns.total_time_overrun_days / 30.0).round() as i64,
            bottom_unit: "months",
        },
        OverrunStep {
            label: "Dépassement des coûts",
            value: overruns.cost_overruns,
            total,
            top_percent: share(overruns.cost_overruns),
            bottom_value: (overruns.total_cost_overrun / 1_000_000.0).round() as i64,
            bottom_unit: "M DZD",
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostlyBar<'a> {
    pub operation: &'a CostlyOperation,
    /// Width relative to the most costly operation, 0..=1
    pub ratio: f64,
}

/// Top three operations by cost, scaled against the first
pub fn top_costly(operations: &[CostlyOperation]) -> Vec<CostlyBar<'_>> {
    let mut sorted: Vec<&CostlyOperation> = operations.iter().collect();
    sorted.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
    sorted.truncate(3);

    let max = sorted.first().map(|op| op.total_cost).unwrap_or(0.0);
    sorted
        .into_iter()
        .map(|operation| CostlyBar {
            operation,
            ratio: if max > 0.0 { operation.total_cost / max } else { 0.0 },
        })
        .collect()
}

/// Everything the dashboard command prints
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary<'a> {
    pub phase_cards: Vec<PhaseCard>,
    pub total_amount: f64,
    pub totals: TotalsCard,
    pub overruns: [OverrunStep; 2],
    pub costly: Vec<CostlyBar<'a>>,
}

impl<'a> DashboardSummary<'a> {
    pub fn from_data(data: &'a DashboardData) -> Self {
        Self {
            phase_cards: phase_cards(&data.phase_costs),
            total_amount: total_amount(&data.phase_costs),
            totals: totals_card(&data.total_phases_cost),
            overruns: overrun_steps(&data.overruns),
            costly: top_costly(&data.costly_operations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> DashboardData {
        serde_json::from_value(json!({
            "phaseCosts": [
                {"phaseNumber": 1, "plannedCost": 1000.0, "actualCost": 1200.0},
                {"phaseNumber": 2, "plannedCost": 800.0, "actualCost": 0.0},
                {"plannedCost": 300.0},
                {"phaseNumber": 4, "plannedCost": 50.0, "actualCost": 40.0},
                {"phaseNumber": 5, "plannedCost": 10.0}
            ],
            "costlyOperations": [
                {"operationType": "Tubage", "totalCost": 500.0, "operationCount": 2},
                {"operationType": "Forage", "totalCost": 2000.0, "operationCount": 5},
                {"operationType": "Cimentation", "totalCost": 1000.0},
                {"operationType": "Logging", "totalCost": 100.0}
            ],
            "totalPhasesCost": {"totalActualCost": 0.0, "totalPlannedCost": 2500000.0,
                                "costOverrun": 0.0, "totalPhases": 4, "costOverrunPercentage": -2.5},
            "overruns": {"timeOverruns": 1, "costOverruns": 2, "totalPhases": 3,
                         "totalTimeOverrunDays": 75.0, "totalCostOverrun": 3600000.0}
        }))
        .unwrap()
    }

    #[test]
    fn test_phase_cards() {
        let data = data();
        let cards = phase_cards(&data.phase_costs);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0], PhaseCard { label: "Phase1".into(), amount: 1200.0 });
        assert_eq!(cards[1].amount, 800.0);
        assert_eq!(cards[2].label, "Phase3");
        assert_eq!(total_amount(&data.phase_costs), 1200.0 + 800.0 + 300.0 + 40.0 + 10.0);
    }

    #[test]
    fn test_totals_card() {
        let card = totals_card(&data().total_phases_cost);
        assert_eq!(card.amount, 2500000.0);
        assert_eq!(card.caption(), "Planned Total");
        assert_eq!(card.overrun, None);
        assert_eq!(card.percentage_label().as_deref(), Some("-2.5% vs planned"));
    }

    #[test]
    fn test_overrun_steps() {
        let [time, cost] = overrun_steps(&data().overruns);
        assert_eq!((time.value, time.total, time.top_percent, time.bottom_value), (1, 3, 33, 3));
        assert_eq!((cost.top_percent, cost.bottom_value), (67, 4));

        let [empty, _] = overrun_steps(&Overruns::default());
        assert_eq!((empty.total, empty.top_percent), (1, 0));
    }

    #[test]
    fn test_top_costly() {
        let data = data();
        let bars = top_costly(&data.costly_operations);
        let names: Vec<&str> = bars.iter().map(|b| b.operation.operation_type.as_str()).collect();
        assert_eq!(names, vec!["Forage", "Cimentation", "Tubage"]);
        assert_eq!(bars[0].ratio, 1.0);
        assert_eq!(bars[2].ratio, 0.25);
    }
}
