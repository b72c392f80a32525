use crate::api::models::{Operation, Phase, TypeIndicateur};
use crate::auth::ExpectedRole;
use crate::reports::{DailyReportDraft, DraftIndicator, DraftOperation};
use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{Input, Password, Select};

/// Interactive confirmation using an arrow-key Yes/No selection
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = ["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

pub fn prompt_delete_confirmation(what: &str) -> Result<bool> {
    prompt_confirmation(&format!("Delete {}? This cannot be undone.", what), false)
}

/// Text input with an optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default_val) = default {
        input = input.default(default_val.to_string());
    }
    Ok(input.interact_text()?)
}

/// Text input that may be left blank
pub fn optional_input(prompt: &str) -> Result<Option<String>> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Number input; blank means none
pub fn optional_number(prompt: &str) -> Result<Option<f64>> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|raw: &String| -> Result<(), String> {
            if raw.trim().is_empty() || raw.trim().parse::<f64>().is_ok() {
                Ok(())
            } else {
                Err("Enter a number".to_string())
            }
        })
        .interact_text()?;
    Ok(value.trim().parse().ok())
}

pub fn prompt_email(default: Option<String>) -> Result<String> {
    match default {
        Some(email) => Ok(email),
        None => Ok(Input::<String>::new().with_prompt("Email").interact_text()?),
    }
}

pub fn prompt_password(default: Option<String>) -> Result<String> {
    match default {
        Some(password) => Ok(password),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}

pub fn prompt_role(default: Option<ExpectedRole>) -> Result<ExpectedRole> {
    if let Some(role) = default {
        return Ok(role);
    }
    let roles = [ExpectedRole::Engineer, ExpectedRole::Manager];
    let items: Vec<&str> = roles.iter().map(|r| r.title()).collect();
    let selection = Select::new()
        .with_prompt("Sign in as")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(roles[selection])
}

pub fn prompt_solution() -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt("Implemented solution")
        .allow_empty(true)
        .interact_text()?)
}

/// Report name, date, phase, depth, lithology and completion
pub fn prompt_daily_header(phases: &[Phase]) -> Result<DailyReportDraft> {
    let report_name = text_input("Report name", None)?;
    let mut draft = DailyReportDraft::new(report_name);

    let date = Input::<String>::new()
        .with_prompt("Report date (YYYY-MM-DD)")
        .default(draft.report_date.format("%Y-%m-%d").to_string())
        .validate_with(|raw: &String| -> Result<(), String> {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "Use the YYYY-MM-DD format".to_string())
        })
        .interact_text()?;
    draft.report_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?;

    if !phases.is_empty() {
        let labels: Vec<String> = phases.iter().map(Phase::label).collect();
        let selection = Select::new()
            .with_prompt("Current phase")
            .items(&labels)
            .default(0)
            .interact()?;
        draft.phase_id = Some(phases[selection].id);
    }

    draft.current_depth = optional_number("Current depth (m, blank to skip)")?;
    draft.lithology = optional_input("Lithology (blank to skip)")?;
    draft.phase_completed = prompt_confirmation("Is the phase completed?", false)?;

    Ok(draft)
}

/// Repeatedly pick an operation, its additional cost and indicators
pub fn prompt_draft_operations(
    draft: &mut DailyReportDraft,
    available: &[Operation],
    indicator_types: &[TypeIndicateur],
) -> Result<()> {
    if available.is_empty() {
        return Ok(());
    }
    let labels: Vec<String> = available
        .iter()
        .map(|op| format!("{} (#{})", op.name(), op.id))
        .collect();

    while prompt_confirmation("Add an operation cost?", draft.operations.is_empty())? {
        let selection = Select::new()
            .with_prompt("Operation")
            .items(&labels)
            .default(0)
            .interact()?;

        let additional_cost = optional_number("Additional cost")?.unwrap_or(0.0);
        let mut entry = DraftOperation {
            operation_id: Some(available[selection].id),
            additional_cost,
            indicators: Vec::new(),
        };

        if !indicator_types.is_empty() {
            let names: Vec<String> = indicator_types.iter().map(TypeIndicateur::display_name).collect();
            while prompt_confirmation("Add an indicator for this operation?", false)? {
                let kind = Select::new()
                    .with_prompt("Indicator type")
                    .items(&names)
                    .default(0)
                    .interact()?;
                entry.indicators.push(DraftIndicator {
                    type_indicateur_id: Some(indicator_types[kind].id),
                    valeur_reelle: optional_number("Value")?,
                    commentaire: optional_input("Comment (blank to skip)")?,
                });
            }
        }

        draft.operations.push(entry);
    }

    Ok(())
}
