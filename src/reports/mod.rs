//! Daily and provisional report workflows

pub mod daily;
pub mod provisional;
pub mod template;
pub mod validation;

pub use daily::{
    DailyReportContext, DailyReportDraft, DailyReportError, DailyReportOutcome, DraftIndicator,
    DraftOperation, submit_daily_report,
};
pub use provisional::{
    PlanFile, PlanOperation, PlanOutcome, PlanPhase, PlanSnapshot, ProvisionalPlan, submit_plan,
};
pub use validation::{
    DateField, DateIssue, NO_ACTIVE_PHASES, ValidationError, validate_dates, validate_operations,
};
