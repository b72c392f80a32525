//! Starter files for `report template`

pub const DAILY_TEMPLATE: &str = r#"# Daily report draft
# Submit with: forage-cli report daily <puit-id> --file <this file>

report_name = "Daily report"
# Defaults to today when omitted
report_date = "2024-01-01"
# Id of the phase being drilled (see: forage-cli wells show <puit-id>)
phase_id = 1
current_depth = 0.0
lithology = ""
# Set when the phase finished today
phase_completed = false

# One block per operation that received cost today
[[operations]]
operation_id = 1
additional_cost = 0.0

# Optional measured indicators for the operation above
[[operations.indicators]]
type_indicateur_id = 1
valeur_reelle = 0.0
commentaire = ""
"#;

pub const PROVISIONAL_TEMPLATE: &str = r#"# Provisional plan
# Apply with: forage-cli report provisional <puit-id> --file <this file>
# Only the fields present override the plan loaded from the backend.

title = "Provisional plan"

[[phases]]
number = 1
description = "26 in. surface hole"
start_date = "2024-01-01"
end_date = "2024-01-15"
planned_depth = 500.0

# Listing operations replaces the phase's operations.
# Operations without an id are created; keep ids to update existing ones.
[[phases.operations]]
name = "Forage"
code = "FOR"
cost = 100000.0
active = true

[[phases]]
number = 2
start_date = "2024-01-16"
end_date = "2024-02-10"
planned_depth = 1500.0
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::daily::DailyReportDraft;
    use crate::reports::provisional::{PlanFile, ProvisionalPlan};

    #[test]
    fn test_daily_template_parses() {
        let draft = DailyReportDraft::parse(DAILY_TEMPLATE).unwrap();
        assert_eq!(draft.operations.len(), 1);
        assert_eq!(draft.operations[0].indicators.len(), 1);
    }

    #[test]
    fn test_provisional_template_merges() {
        let file = PlanFile::parse(PROVISIONAL_TEMPLATE).unwrap();
        let mut plan = ProvisionalPlan::empty("x");
        plan.merge(file).unwrap();
        assert_eq!(plan.title, "Provisional plan");
        assert!(plan.phases[0].has_data());
        assert!(plan.phases[1].has_data());
        assert!(!plan.phases[2].has_data());
    }
}
