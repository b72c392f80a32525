//! End-of-day report submission.
//!
//! A daily report touches several resources in sequence: the report itself,
//! the operations it adds cost to, their indicators, the forage total, the
//! current phase and finally problem detection. Only the report creation is
//! fatal; every later step that fails is reported as a warning.

use super::validation::{ValidationError, validate_daily_draft, validate_daily_header};
use crate::api::models::{
    DailyReport, DailyReportPayload, EntityRef, Forage, IndicateurPayload, Operation,
    OperationPayload, OperationStatut, Phase, PhasePayload, ProblemDetectionRequest, Probleme, Puit,
    TypeIndicateur, TypeOperation,
};
use crate::api::{ApiError, ForageClient};
use crate::tracking::format::group_thousands;
use anyhow::Context;
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const CREATE_FALLBACK: &str = "Failed to create daily report";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// What the engineer enters for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReportDraft {
    pub report_name: String,
    #[serde(default = "today")]
    pub report_date: NaiveDate,
    #[serde(default)]
    pub phase_id: Option<i64>,
    #[serde(default)]
    pub current_depth: Option<f64>,
    #[serde(default)]
    pub lithology: Option<String>,
    #[serde(default)]
    pub phase_completed: bool,
    #[serde(default)]
    pub operations: Vec<DraftOperation>,
}

/// Cost added to an existing operation today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOperation {
    #[serde(default)]
    pub operation_id: Option<i64>,
    #[serde(default)]
    pub additional_cost: f64,
    #[serde(default)]
    pub indicators: Vec<DraftIndicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftIndicator {
    #[serde(default)]
    pub type_indicateur_id: Option<i64>,
    #[serde(default)]
    pub valeur_reelle: Option<f64>,
    #[serde(default)]
    pub commentaire: Option<String>,
}

impl DailyReportDraft {
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            report_name: report_name.into(),
            report_date: today(),
            phase_id: None,
            current_depth: None,
            lithology: None,
            phase_completed: false,
            operations: Vec::new(),
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse daily report draft")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid draft file: {:?}", path))
    }

    /// Sum of the additional costs, which becomes the report's daily cost
    pub fn total_additional_cost(&self) -> f64 {
        self.operations.iter().map(|op| op.additional_cost).sum()
    }
}

/// Everything a daily report form needs about one well
#[derive(Debug, Clone)]
pub struct DailyReportContext {
    pub puit: Puit,
    pub forage: Option<Forage>,
    pub phases: Vec<Phase>,
    pub operation_types: Vec<TypeOperation>,
    pub indicator_types: Vec<TypeIndicateur>,
}

impl DailyReportContext {
    pub async fn load(client: &ForageClient, puit_id: i64) -> Result<Self, ApiError> {
        let puits = client.puits();
        let forages = client.forages();
        let catalog = client.catalog();
        let (puit, forage, operation_types, indicator_types) = futures::try_join!(
            puits.get(puit_id),
            forages.active_for_puit(puit_id),
            catalog.type_operations(),
            catalog.type_indicateurs(),
        )?;

        let phases = match &forage {
            Some(forage) => client.phases().by_forage(forage.id).await?,
            None => Vec::new(),
        };

        debug!(
            "Loaded daily report context for well {}: {} phases, {} operation types, {} indicator types",
            puit_id,
            phases.len(),
            operation_types.len(),
            indicator_types.len()
        );

        Ok(Self {
            puit,
            forage,
            phases,
            operation_types,
            indicator_types,
        })
    }

    pub fn phase(&self, id: i64) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Phases that can still take a daily report
    pub fn active_phases(&self) -> Vec<Phase> {
        self.phases.iter().filter(|p| !p.is_completed()).cloned().collect()
    }

    pub fn indicator_type(&self, id: i64) -> Option<&TypeIndicateur> {
        self.indicator_types.iter().find(|t| t.id == id)
    }

    /// Operations of the phase still open for cost: planned or in progress
    pub async fn available_operations(
        &self,
        client: &ForageClient,
        phase_id: i64,
    ) -> Result<Vec<Operation>, ApiError> {
        let operations = client.operations().by_phase(phase_id).await?;
        Ok(operations.into_iter().filter(Operation::is_active).collect())
    }
}

#[derive(Debug, Error)]
pub enum DailyReportError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Could not load the operations of the current phase")]
    Operations(#[source] ApiError),

    #[error("Error creating daily report: {0}")]
    Create(String),
}

#[derive(Debug, Clone)]
pub struct DailyReportOutcome {
    pub report: DailyReport,
    pub total_additional_cost: f64,
    pub updated_operation_ids: Vec<i64>,
    pub detected_problems: Vec<Probleme>,
    pub detection_failed: bool,
    pub warnings: Vec<String>,
}

impl DailyReportOutcome {
    pub fn summary(&self, currency: &str) -> String {
        let total = group_thousands(self.total_additional_cost);
        let mut summary = if !self.detected_problems.is_empty() {
            let problems = self
                .detected_problems
                .iter()
                .map(|p| {
                    let description: String = p
                        .description
                        .as_deref()
                        .unwrap_or("")
                        .chars()
                        .take(100)
                        .collect();
                    let kind = p.kind.map(|k| k.code()).unwrap_or("UNKNOWN");
                    format!("• {}: {}...", kind, description)
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "Daily report created successfully! Total additional cost of {} {} has been added.\n\n\
                 ⚠️ {} problem(s) were automatically detected:\n{}\n\n\
                 These problems have been added to the alerts system for review.",
                total,
                currency,
                self.detected_problems.len(),
                problems
            )
        } else {
            format!(
                "Daily report created successfully! Total additional cost of {} {} has been added to operations and forage.",
                total, currency
            )
        };

        if self.detection_failed {
            summary.push_str(
                "\n\nNote: Automatic problem detection encountered an error, but the report was saved successfully.",
            );
        }

        if !self.warnings.is_empty() {
            summary.push_str("\n\nWarnings:");
            for warning in &self.warnings {
                summary.push_str("\n  - ");
                summary.push_str(warning);
            }
        }

        summary
    }
}

/// Validate and submit a daily report
pub async fn submit_daily_report(
    client: &ForageClient,
    ctx: &DailyReportContext,
    draft: &DailyReportDraft,
) -> Result<DailyReportOutcome, DailyReportError> {
    validate_daily_header(draft, &ctx.phases)?;

    let phase = draft
        .phase_id
        .and_then(|id| ctx.phase(id))
        .ok_or_else(|| ValidationError("Please select a current phase".to_string()))?;

    let available = if draft.operations.is_empty() {
        Vec::new()
    } else {
        ctx.available_operations(client, phase.id)
            .await
            .map_err(DailyReportError::Operations)?
    };
    validate_daily_draft(draft, &ctx.phases, &available)?;

    let total_additional_cost = draft.total_additional_cost();
    let mut warnings = Vec::new();

    let is_first_report = match client.daily_reports().for_puit(ctx.puit.id).await {
        Ok(reports) => reports.is_empty(),
        Err(e) => {
            debug!("Existing reports unavailable ({}), treating as first report", e);
            true
        }
    };

    let payload = DailyReportPayload {
        report_name: draft.report_name.trim().to_string(),
        report_date: draft.report_date,
        concerned_well: EntityRef::new(ctx.puit.id),
        current_phase: phase.clone(),
        current_depth: draft.current_depth.unwrap_or(0.0),
        lithology: draft.lithology.clone().filter(|l| !l.trim().is_empty()),
        daily_cost: total_additional_cost,
    };
    let report = client
        .daily_reports()
        .create(&payload)
        .await
        .map_err(|e| DailyReportError::Create(e.message_or(CREATE_FALLBACK)))?;
    info!("Created daily report {} for well {}", report.id, ctx.puit.id);

    let mut updated_operation_ids = Vec::new();
    for entry in &draft.operations {
        let Some(operation_id) = entry.operation_id else {
            continue;
        };

        if entry.additional_cost <= 0.0 {
            if !entry.indicators.is_empty() {
                warnings.push(format!(
                    "Operation {}: no additional cost, {} indicator(s) not recorded",
                    operation_id,
                    entry.indicators.len()
                ));
            }
            continue;
        }

        match add_operation_cost(client, operation_id, phase.id, report.id, entry.additional_cost).await {
            Ok(()) => {
                updated_operation_ids.push(operation_id);
                record_indicators(client, ctx, entry, operation_id, report.id, &mut warnings).await;
            }
            Err(e) => {
                warn!("Failed to update operation {}: {}", operation_id, e);
                warnings.push(format!(
                    "Operation {}: cost could not be updated - {}",
                    operation_id,
                    e.server_message()
                ));
            }
        }
    }

    if let Some(forage) = &ctx.forage {
        let mut updated = forage.clone();
        if is_first_report {
            updated.date_debut = Some(draft.report_date);
        }
        updated.cout = Some(forage.cost() + total_additional_cost);
        if let Err(e) = client.forages().update(&updated).await {
            warn!("Failed to update forage {}: {}", forage.id, e);
            warnings.push(format!("Forage cost could not be updated - {}", e.server_message()));
        }
    }

    if let Some(depth) = draft.current_depth.filter(|d| *d > 0.0) {
        if let Some(warning) = update_phase_progress(client, ctx, phase, &report, draft, depth).await {
            warnings.push(warning);
        }
    }

    let detection = ProblemDetectionRequest {
        daily_report_id: report.id,
        updated_operation_ids: updated_operation_ids.clone(),
    };
    let (detected_problems, detection_failed) = match client.problemes().detect(&detection).await {
        Ok(problems) => {
            info!("Problem detection found {} problem(s)", problems.len());
            (problems, false)
        }
        Err(e) => {
            warn!("Problem detection failed: {}", e);
            (Vec::new(), true)
        }
    };

    Ok(DailyReportOutcome {
        report,
        total_additional_cost,
        updated_operation_ids,
        detected_problems,
        detection_failed,
        warnings,
    })
}

async fn add_operation_cost(
    client: &ForageClient,
    operation_id: i64,
    phase_id: i64,
    report_id: i64,
    additional_cost: f64,
) -> Result<(), ApiError> {
    let current = client.operations().get(operation_id).await?;
    let payload = OperationPayload {
        id: Some(operation_id),
        phase: EntityRef::new(phase_id),
        description: current.description.clone(),
        type_operation: current.type_operation.clone(),
        cout_prev: current.cout_prev,
        cout_reel: Some(current.cout_reel.unwrap_or(0.0) + additional_cost),
        statut: OperationStatut::EnCours,
        daily_report: Some(EntityRef::new(report_id)),
        created_by: None,
    };
    client.operations().update(operation_id, &payload).await?;
    debug!("Added {} to operation {}", additional_cost, operation_id);
    Ok(())
}

async fn record_indicators(
    client: &ForageClient,
    ctx: &DailyReportContext,
    entry: &DraftOperation,
    operation_id: i64,
    report_id: i64,
    warnings: &mut Vec<String>,
) {
    for indicator in &entry.indicators {
        let (Some(type_id), Some(value)) = (indicator.type_indicateur_id, indicator.valeur_reelle) else {
            continue;
        };
        let Some(type_indicateur) = ctx.indicator_type(type_id) else {
            warnings.push(format!(
                "Operation {}: unknown indicator type {}, skipped",
                operation_id, type_id
            ));
            continue;
        };

        let payload = IndicateurPayload {
            operation: EntityRef::new(operation_id),
            type_indicateur: type_indicateur.clone(),
            valeur_reelle: value,
            commentaire: indicator.commentaire.clone(),
            date_mesure: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            daily_report: EntityRef::new(report_id),
        };
        if let Err(e) = client.indicateurs().create(&payload).await {
            warn!("Failed to record indicator {} for operation {}: {}", type_id, operation_id, e);
            warnings.push(format!(
                "Operation {}: indicator {} could not be recorded - {}",
                operation_id,
                type_indicateur.display_name(),
                e.server_message()
            ));
        }
    }
}

/// Record depth and real dates on the current phase; returns a warning on failure
async fn update_phase_progress(
    client: &ForageClient,
    ctx: &DailyReportContext,
    phase: &Phase,
    report: &DailyReport,
    draft: &DailyReportDraft,
    depth: f64,
) -> Option<String> {
    let Some(forage_id) = ctx.forage.as_ref().map(|f| f.id).or(phase.forage.map(|f| f.id)) else {
        return Some("Phase data could not be updated - no forage for this well".to_string());
    };

    let is_first_for_phase = match client.daily_reports().for_puit(ctx.puit.id).await {
        Ok(reports) => !reports
            .iter()
            .any(|r| r.id != report.id && r.current_phase.map(|p| p.id) == Some(phase.id)),
        Err(_) => true,
    };

    let mut payload = PhasePayload::from_phase(phase, forage_id);
    payload.profondeur_reelle = Some(depth);
    if is_first_for_phase {
        payload.date_debut_reelle = Some(draft.report_date);
    }
    if draft.phase_completed {
        payload.date_fin_reelle = Some(draft.report_date);
    }

    match client.phases().update(phase.id, &payload).await {
        Ok(_) => {
            info!(
                "Phase {} updated: depth {}, first report {}, completed {}",
                phase.id, depth, is_first_for_phase, draft.phase_completed
            );
            None
        }
        Err(ApiError::Rejected { message }) => {
            warn!("Phase {} update rejected: {}", phase.id, message);
            Some(format!("Phase data could not be updated - {}", message))
        }
        Err(e) => {
            warn!("Phase {} update failed: {}", phase.id, e);
            Some(format!("Error updating phase data - {}", e.server_message()))
        }
    }
}
