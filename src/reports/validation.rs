//! Checks run before any report is written to the backend

use super::daily::DailyReportDraft;
use super::provisional::{PlanOperation, PlanPhase};
use crate::api::models::{Operation, Phase, TypeOperation};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: &str) -> Self {
        Self(message.to_string())
    }
}

pub const NO_ACTIVE_PHASES: &str =
    "No active phases available. All phases for this well have been completed.";

/// Report name and current phase, checkable before the phase's operations are known
pub fn validate_daily_header(draft: &DailyReportDraft, phases: &[Phase]) -> Result<(), ValidationError> {
    if draft.report_name.trim().is_empty() {
        return Err(ValidationError::new("Please enter a report name"));
    }

    if !phases.is_empty() && phases.iter().all(Phase::is_completed) {
        return Err(ValidationError::new(NO_ACTIVE_PHASES));
    }

    let Some(phase) = draft
        .phase_id
        .and_then(|id| phases.iter().find(|p| p.id == id))
    else {
        return Err(ValidationError::new("Please select a current phase"));
    };
    if phase.is_completed() {
        return Err(ValidationError(format!(
            "{} has already been completed. Please select an active phase",
            phase.label()
        )));
    }

    Ok(())
}

/// First problem with a daily draft, in the order a user would fix them
pub fn validate_daily_draft(
    draft: &DailyReportDraft,
    phases: &[Phase],
    available: &[Operation],
) -> Result<(), ValidationError> {
    validate_daily_header(draft, phases)?;

    let all_exist = draft.operations.iter().all(|entry| {
        entry
            .operation_id
            .is_some_and(|id| available.iter().any(|op| op.id == id))
    });
    if !all_exist {
        return Err(ValidationError::new(
            "Please select an existing operation for all added operations",
        ));
    }

    if draft
        .operations
        .iter()
        .any(|entry| !entry.additional_cost.is_finite() || entry.additional_cost < 0.0)
    {
        return Err(ValidationError::new("Additional cost must be non-negative"));
    }

    if draft.current_depth.is_some_and(|d| !d.is_finite() || d < 0.0) {
        return Err(ValidationError::new("Current depth must be non-negative"));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateField {
    Start,
    End,
}

/// A date problem on one plan slot (0-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateIssue {
    pub slot: usize,
    pub field: DateField,
    pub message: String,
}

/// Phase dates must be ordered within a phase and between consecutive phases
pub fn validate_dates(phases: &[PlanPhase]) -> Vec<DateIssue> {
    let mut issues = Vec::new();

    for (slot, phase) in phases.iter().enumerate() {
        if let (Some(start), Some(end)) = (phase.start_date, phase.end_date) {
            if end <= start {
                issues.push(DateIssue {
                    slot,
                    field: DateField::End,
                    message: "End date must be after start date".to_string(),
                });
            }
        }

        if slot > 0 {
            if let (Some(previous_end), Some(start)) = (phases[slot - 1].end_date, phase.start_date) {
                if start < previous_end {
                    issues.push(DateIssue {
                        slot,
                        field: DateField::Start,
                        message: format!("Phase {} must start after Phase {} ends", slot + 1, slot),
                    });
                }
            }
        }
    }

    issues
}

/// Check one planned operation against the catalogue
pub fn check_operation<'a>(
    number: u32,
    operation: &PlanOperation,
    catalog: &'a [TypeOperation],
) -> Result<&'a TypeOperation, String> {
    let name = operation.name.as_deref().filter(|n| !n.trim().is_empty());
    let code = operation.code.as_deref().filter(|c| !c.trim().is_empty());

    let (name, code) = match (name, code) {
        (Some(name), Some(code)) => (name, code),
        _ => {
            return Err(format!(
                "Phase {}: Operation \"{}\" is invalid or not selected",
                number,
                name.unwrap_or("No name")
            ));
        }
    };

    let type_operation = catalog
        .iter()
        .find(|t| t.code.as_deref() == Some(code))
        .ok_or_else(|| {
            format!(
                "Phase {}: Operation type \"{}\" ({}) not found in system",
                number, name, code
            )
        })?;

    if !operation.cost.is_finite() || operation.cost < 0.0 {
        return Err(format!(
            "Phase {}: Operation \"{}\" has invalid cost ({})",
            number, name, operation.cost
        ));
    }

    Ok(type_operation)
}

pub fn validate_operations(phases: &[PlanPhase], catalog: &[TypeOperation]) -> Vec<String> {
    phases
        .iter()
        .flat_map(|phase| {
            phase
                .operations
                .iter()
                .filter_map(|op| check_operation(phase.number, op, catalog).err())
        })
        .collect()
}
