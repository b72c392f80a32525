//! Provisional plan: the four phase slots of a forage with their planned
//! dates, depth and operations.

use super::validation::check_operation;
use crate::api::models::{
    Diametre, EntityRef, Operation, OperationPayload, OperationStatut, Phase, PhasePayload,
    TypeOperation,
};
use crate::api::{ApiError, ForageClient};
use anyhow::{Context, bail};
use chrono::NaiveDate;
use futures::future::try_join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const SLOT_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOperation {
    /// Backend id; absent for operations not yet created
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub cost: f64,
    /// Planned or in progress, as opposed to finished
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub is_new: bool,
}

fn default_active() -> bool {
    true
}

impl PlanOperation {
    fn from_operation(op: &Operation) -> Self {
        Self {
            id: Some(op.id),
            name: Some(op.name()),
            code: op.type_code().map(str::to_string),
            cost: op.cout_prev.unwrap_or(0.0),
            active: op.is_active(),
            is_new: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("No name")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanPhase {
    pub number: u32,
    pub diametre: Diametre,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub planned_depth: Option<f64>,
    pub operations: Vec<PlanOperation>,
}

impl PlanPhase {
    /// Default slot for phase `number` (1..=4)
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            diametre: Diametre::for_phase_number(number).unwrap_or(Diametre::Pouces26),
            description: None,
            start_date: None,
            end_date: None,
            planned_depth: None,
            operations: Vec::new(),
        }
    }

    fn from_phase(phase: &Phase, operations: &[Operation]) -> Self {
        let number = phase.numero_phase.unwrap_or(0);
        Self {
            number,
            diametre: phase
                .diametre
                .or_else(|| Diametre::for_phase_number(number))
                .unwrap_or(Diametre::Pouces26),
            description: phase.description.clone().filter(|d| !d.is_empty()),
            start_date: phase.date_debut_prevue,
            end_date: phase.date_fin_prevue,
            planned_depth: phase.profondeur_prevue,
            operations: operations.iter().map(PlanOperation::from_operation).collect(),
        }
    }

    /// Slots with nothing entered are not sent
    pub fn has_data(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
            || self.start_date.is_some()
            || self.end_date.is_some()
            || !self.operations.is_empty()
    }

    pub fn planned_cost(&self) -> f64 {
        self.operations.iter().map(|op| op.cost).sum()
    }

    fn payload(&self, id: Option<i64>, forage_id: i64) -> PhasePayload {
        PhasePayload {
            id,
            forage: EntityRef::new(forage_id),
            numero_phase: self.number,
            diametre: self.diametre,
            description: Some(self.description.clone().unwrap_or_default()),
            date_debut_prevue: self.start_date,
            date_fin_prevue: self.end_date,
            date_debut_reelle: None,
            date_fin_reelle: None,
            profondeur_prevue: self.planned_depth.filter(|d| *d != 0.0),
            profondeur_reelle: None,
        }
    }
}

/// Planned values of a phase as last loaded or saved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseSnapshot {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub planned_depth: Option<f64>,
}

/// What the backend held, for change detection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanSnapshot {
    pub phases: HashMap<i64, PhaseSnapshot>,
    pub operation_costs: HashMap<i64, f64>,
}

impl PlanSnapshot {
    fn record_phase(&mut self, phase_id: i64, slot: &PlanPhase) {
        self.phases.insert(
            phase_id,
            PhaseSnapshot {
                start_date: slot.start_date,
                end_date: slot.end_date,
                planned_depth: slot.planned_depth,
            },
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalPlan {
    pub title: String,
    pub forage_id: Option<i64>,
    pub phases: Vec<PlanPhase>,
}

impl ProvisionalPlan {
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            forage_id: None,
            phases: (1..=SLOT_COUNT as u32).map(PlanPhase::empty).collect(),
        }
    }

    /// Load the plan of a well's active forage
    pub async fn load(client: &ForageClient, puit_id: i64) -> anyhow::Result<(Self, PlanSnapshot)> {
        let forage = client
            .forages()
            .active_for_puit(puit_id)
            .await
            .context("Failed to load forages")?;
        let Some(forage) = forage else {
            bail!("No forages found for this well.");
        };

        let phases = client
            .phases()
            .by_forage(forage.id)
            .await
            .context("Failed to load phases")?;

        let operations = try_join_all(phases.iter().map(|phase| async move {
            match client.operations().by_phase(phase.id).await {
                Ok(ops) => Ok(ops),
                Err(ApiError::Rejected { .. }) => Ok(Vec::new()),
                Err(e) => Err(e),
            }
        }))
        .await
        .context("Failed to load operations")?;

        let mut plan = Self::empty(format!("Report for Well #{}", puit_id));
        plan.forage_id = Some(forage.id);
        let mut snapshot = PlanSnapshot::default();

        for (phase, ops) in phases.iter().zip(&operations) {
            let loaded = PlanPhase::from_phase(phase, ops);
            snapshot.record_phase(phase.id, &loaded);
            for op in ops {
                snapshot.operation_costs.insert(op.id, op.cout_prev.unwrap_or(0.0));
            }
            if let Some(slot) = plan.phases.iter_mut().find(|s| s.number == loaded.number) {
                *slot = loaded;
            }
        }

        debug!(
            "Loaded plan for forage {}: {} phases, {} operations",
            forage.id,
            phases.len(),
            snapshot.operation_costs.len()
        );
        Ok((plan, snapshot))
    }

    /// Overlay a plan file onto this plan, slot by slot
    pub fn merge(&mut self, file: PlanFile) -> anyhow::Result<()> {
        if let Some(title) = file.title {
            self.title = title;
        }
        for entry in file.phases {
            let slot = self
                .phases
                .iter_mut()
                .find(|s| s.number == entry.number)
                .with_context(|| format!("Phase {} does not exist; phases are numbered 1 to 4", entry.number))?;

            if let Some(description) = entry.description {
                slot.description = Some(description);
            }
            if let Some(start) = entry.start_date {
                slot.start_date = Some(start);
            }
            if let Some(end) = entry.end_date {
                slot.end_date = Some(end);
            }
            if let Some(depth) = entry.planned_depth {
                slot.planned_depth = Some(depth);
            }
            if let Some(operations) = entry.operations {
                slot.operations = operations
                    .into_iter()
                    .map(|mut op| {
                        op.is_new = op.is_new || op.id.is_none();
                        op
                    })
                    .collect();
            }
        }
        Ok(())
    }

    pub fn total_planned_cost(&self) -> f64 {
        self.phases.iter().map(PlanPhase::planned_cost).sum()
    }
}

/// TOML plan file; every field is optional and overrides the loaded plan
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phases: Vec<PlanFilePhase>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanFilePhase {
    pub number: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub planned_depth: Option<f64>,
    /// Replaces the slot's operations when present
    #[serde(default)]
    pub operations: Option<Vec<PlanOperation>>,
}

impl PlanFile {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse plan file")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid plan file: {:?}", path))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOutcome {
    pub created_phases: Vec<Phase>,
    pub phases_updated: bool,
    pub operations_updated: bool,
    pub issues: Vec<String>,
}

impl PlanOutcome {
    pub fn summary(&self) -> String {
        if !self.issues.is_empty() {
            format!(
                "Some operations or phases could not be saved:\n{}",
                self.issues.join("\n")
            )
        } else if !self.created_phases.is_empty() || self.operations_updated || self.phases_updated {
            format!(
                "Successfully processed: {} new phases created, {}, and {}.",
                self.created_phases.len(),
                if self.operations_updated {
                    "operations updated/created"
                } else {
                    "no operations changed"
                },
                if self.phases_updated {
                    "existing phases updated"
                } else {
                    "no phase updates"
                }
            )
        } else {
            "No changes were made to phases or operations.".to_string()
        }
    }
}

/// Write the plan's phases and operations to the backend.
///
/// Works slot by slot; a failure is recorded as an issue and the rest of the
/// plan is still sent. Backend ids and costs are written back into `plan`
/// and `snapshot` is refreshed to match.
pub async fn submit_plan(
    client: &ForageClient,
    forage_id: i64,
    plan: &mut ProvisionalPlan,
    snapshot: &mut PlanSnapshot,
    catalog: &[TypeOperation],
    created_by: Option<i64>,
) -> Result<PlanOutcome, ApiError> {
    let existing_phases = match client.phases().by_forage(forage_id).await {
        Ok(phases) => phases,
        Err(ApiError::Rejected { message }) => {
            debug!("Existing phases unavailable: {}", message);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let mut outcome = PlanOutcome::default();

    for slot in plan.phases.iter_mut() {
        if !slot.has_data() {
            debug!("Skipping phase {}: nothing entered", slot.number);
            continue;
        }

        let existing = existing_phases
            .iter()
            .find(|p| p.numero_phase == Some(slot.number));

        let phase_id = match existing {
            Some(existing) => {
                match update_phase(client, forage_id, slot, existing, snapshot).await {
                    PhaseWrite::Written => {
                        outcome.phases_updated = true;
                        snapshot.record_phase(existing.id, slot);
                    }
                    PhaseWrite::Unchanged => {}
                    PhaseWrite::Rejected => {
                        outcome
                            .issues
                            .push(format!("Phase {}: Failed to update phase", slot.number));
                    }
                    PhaseWrite::Failed(message) => {
                        outcome
                            .issues
                            .push(format!("Phase {}: Error updating phase - {}", slot.number, message));
                        continue;
                    }
                }
                existing.id
            }
            None => match client.phases().create(&slot.payload(None, forage_id)).await {
                Ok(created) => {
                    info!("Created phase {} with id {}", slot.number, created.id);
                    snapshot.record_phase(created.id, slot);
                    let id = created.id;
                    outcome.created_phases.push(created);
                    id
                }
                Err(ApiError::Rejected { message }) => {
                    outcome.issues.push(format!(
                        "Phase {}: Failed to create phase - {}",
                        slot.number, message
                    ));
                    continue;
                }
                Err(e) => {
                    outcome.issues.push(format!(
                        "Phase {}: Error creating phase - {}",
                        slot.number,
                        e.server_message()
                    ));
                    continue;
                }
            },
        };

        if slot.operations.is_empty() {
            continue;
        }

        let existing_ops = match client.operations().by_phase(phase_id).await {
            Ok(ops) => ops,
            Err(ApiError::Rejected { .. }) => Vec::new(),
            Err(e) => {
                outcome.issues.push(format!(
                    "Phase {}: Error fetching existing operations - {}",
                    slot.number,
                    e.server_message()
                ));
                continue;
            }
        };

        let number = slot.number;
        for op in slot.operations.iter_mut() {
            if let Err(issue) = check_operation(number, op, catalog) {
                warn!("{}", issue);
                outcome.issues.push(issue);
                continue;
            }

            let payload = operation_payload(phase_id, op, created_by);
            let is_new = op.is_new || !op.id.is_some_and(|id| existing_ops.iter().any(|e| e.id == id));

            if is_new {
                match client.operations().create(&payload).await {
                    Ok(created) => {
                        info!("Created operation \"{}\" with id {}", op.display_name(), created.id);
                        op.id = Some(created.id);
                        op.is_new = false;
                        op.cost = created.cout_prev.unwrap_or(op.cost);
                        snapshot.operation_costs.insert(created.id, op.cost);
                        outcome.operations_updated = true;
                    }
                    Err(ApiError::Transport { source, .. }) => {
                        outcome.issues.push(format!(
                            "Phase {}: Network error creating operation \"{}\" - {}",
                            number,
                            op.display_name(),
                            source
                        ));
                    }
                    Err(e) => {
                        outcome.issues.push(format!(
                            "Phase {}: Failed to create operation \"{}\" - {}",
                            number,
                            op.display_name(),
                            e.server_message()
                        ));
                    }
                }
                continue;
            }

            let Some(id) = op.id else { continue };
            let cost_changed = snapshot
                .operation_costs
                .get(&id)
                .is_some_and(|original| *original != op.cost);
            if !cost_changed {
                debug!("Operation \"{}\" unchanged", op.display_name());
                continue;
            }

            // Actual cost belongs to daily reports and is kept
            let cout_reel = existing_ops
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.cout_reel)
                .or(payload.cout_reel);
            let payload = OperationPayload {
                id: Some(id),
                cout_reel,
                ..payload
            };
            match client.operations().update(id, &payload).await {
                Ok(updated) => {
                    op.cost = updated.cout_prev.unwrap_or(op.cost);
                    snapshot.operation_costs.insert(id, op.cost);
                    outcome.operations_updated = true;
                }
                Err(ApiError::Rejected { .. }) => {
                    outcome.issues.push(format!(
                        "Phase {}: Failed to update operation \"{}\"",
                        number,
                        op.display_name()
                    ));
                }
                Err(e) => {
                    outcome.issues.push(format!(
                        "Phase {}: Error updating operation \"{}\" - {}",
                        number,
                        op.display_name(),
                        e.server_message()
                    ));
                }
            }
        }
    }

    info!(
        "Plan submitted: {} phases created, phases updated {}, operations updated {}, {} issue(s)",
        outcome.created_phases.len(),
        outcome.phases_updated,
        outcome.operations_updated,
        outcome.issues.len()
    );
    Ok(outcome)
}

enum PhaseWrite {
    Written,
    Unchanged,
    Rejected,
    Failed(String),
}

async fn update_phase(
    client: &ForageClient,
    forage_id: i64,
    slot: &PlanPhase,
    existing: &Phase,
    snapshot: &PlanSnapshot,
) -> PhaseWrite {
    let original = snapshot.phases.get(&existing.id).cloned().unwrap_or(PhaseSnapshot {
        start_date: existing.date_debut_prevue,
        end_date: existing.date_fin_prevue,
        planned_depth: existing.profondeur_prevue,
    });

    let description_changed = slot.description.as_deref().unwrap_or("")
        != existing.description.as_deref().unwrap_or("");
    let dates_changed = slot.start_date != original.start_date || slot.end_date != original.end_date;
    let depth_changed = slot.planned_depth.unwrap_or(0.0) != original.planned_depth.unwrap_or(0.0);

    if !(description_changed || dates_changed || depth_changed) {
        debug!("Phase {} unchanged", slot.number);
        return PhaseWrite::Unchanged;
    }

    // Progress recorded by daily reports is kept
    let mut payload = slot.payload(Some(existing.id), forage_id);
    payload.date_debut_reelle = existing.date_debut_reelle;
    payload.date_fin_reelle = existing.date_fin_reelle;
    payload.profondeur_reelle = existing.profondeur_reelle;

    match client.phases().update(existing.id, &payload).await {
        Ok(_) => PhaseWrite::Written,
        Err(ApiError::Rejected { message }) => {
            warn!("Phase {} update rejected: {}", slot.number, message);
            PhaseWrite::Rejected
        }
        Err(e) => {
            warn!("Phase {} update failed: {}", slot.number, e);
            PhaseWrite::Failed(e.server_message())
        }
    }
}

fn operation_payload(phase_id: i64, op: &PlanOperation, created_by: Option<i64>) -> OperationPayload {
    OperationPayload {
        id: None,
        phase: EntityRef::new(phase_id),
        description: op.name.clone(),
        type_operation: op.code.clone().map(TypeOperation::with_code),
        cout_prev: Some(op.cost),
        cout_reel: Some(0.0),
        statut: if op.active {
            OperationStatut::Planifie
        } else {
            OperationStatut::Termine
        },
        daily_report: None,
        created_by: created_by.map(EntityRef::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_plan_slots() {
        let plan = ProvisionalPlan::empty("Report for Well #4");
        let numbers: Vec<u32> = plan.phases.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(plan.phases[2].diametre, Diametre::Pouces12_25);
        assert!(plan.phases.iter().all(|p| !p.has_data()));
    }

    #[test]
    fn test_phase_from_backend() {
        let phase: Phase = serde_json::from_value(json!({
            "id": 40, "numeroPhase": 2, "diametre": "POUCES_16",
            "description": "Surface casing",
            "dateDebutPrevue": "2024-04-01T00:00:00", "profondeurPrevue": 900.0
        }))
        .unwrap();
        let ops: Vec<Operation> = serde_json::from_value(json!([
            {"id": 1, "typeOperation": {"code": "FOR", "nom": "Forage"}, "coutPrev": 1000.0, "statut": "EN_COURS"},
            {"id": 2, "description": "Cleanup", "statut": "TERMINE"}
        ]))
        .unwrap();

        let slot = PlanPhase::from_phase(&phase, &ops);
        assert_eq!(slot.number, 2);
        assert_eq!(slot.start_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(slot.operations[0].name.as_deref(), Some("Forage"));
        assert_eq!(slot.operations[0].code.as_deref(), Some("FOR"));
        assert!(slot.operations[0].active);
        assert_eq!(slot.operations[1].name.as_deref(), Some("Cleanup"));
        assert_eq!(slot.operations[1].cost, 0.0);
        assert!(!slot.operations[1].active);
        assert_eq!(slot.planned_cost(), 1000.0);
    }

    #[test]
    fn test_has_data_ignores_depth_alone() {
        let mut slot = PlanPhase::empty(1);
        slot.planned_depth = Some(500.0);
        assert!(!slot.has_data());
        slot.description = Some("Spud".into());
        assert!(slot.has_data());
    }

    #[test]
    fn test_merge_plan_file() {
        let mut plan = ProvisionalPlan::empty("Report for Well #4");
        plan.phases[0].operations.push(PlanOperation {
            id: Some(5),
            name: Some("Old".into()),
            code: Some("OLD".into()),
            cost: 1.0,
            active: true,
            is_new: false,
        });

        let file = PlanFile::parse(
            r#"
title = "Campaign 2024"

[[phases]]
number = 1
start_date = "2024-06-01"
end_date = "2024-06-20"

[[phases.operations]]
name = "Forage"
code = "FOR"
cost = 250000

[[phases]]
number = 3
description = "Intermediate"
"#,
        )
        .unwrap();
        plan.merge(file).unwrap();

        assert_eq!(plan.title, "Campaign 2024");
        assert_eq!(plan.phases[0].operations.len(), 1);
        assert!(plan.phases[0].operations[0].is_new);
        assert!(plan.phases[0].operations[0].active);
        assert_eq!(plan.phases[0].end_date, NaiveDate::from_ymd_opt(2024, 6, 20));
        assert_eq!(plan.phases[2].description.as_deref(), Some("Intermediate"));
        assert_eq!(plan.total_planned_cost(), 250000.0);
    }

    #[test]
    fn test_merge_rejects_unknown_slot() {
        let mut plan = ProvisionalPlan::empty("x");
        let file = PlanFile::parse("[[phases]]\nnumber = 5\n").unwrap();
        assert!(plan.merge(file).is_err());
    }

    #[test]
    fn test_summary_variants() {
        assert_eq!(PlanOutcome::default().summary(), "No changes were made to phases or operations.");

        let updated = PlanOutcome {
            operations_updated: true,
            ..PlanOutcome::default()
        };
        assert_eq!(
            updated.summary(),
            "Successfully processed: 0 new phases created, operations updated/created, and no phase updates."
        );

        let failed = PlanOutcome {
            phases_updated: true,
            issues: vec!["Phase 1: Failed to update phase".into()],
            ..PlanOutcome::default()
        };
        assert_eq!(
            failed.summary(),
            "Some operations or phases could not be saved:\nPhase 1: Failed to update phase"
        );
    }

    #[test]
    fn test_operation_payload_status() {
        let mut op = PlanOperation {
            id: None,
            name: Some("Tubage".into()),
            code: Some("TUB".into()),
            cost: 75.5,
            active: false,
            is_new: true,
        };
        let payload = operation_payload(12, &op, Some(7));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["statut"], "TERMINE");
        assert_eq!(value["typeOperation"], json!({"code": "TUB"}));
        assert_eq!(value["createdBy"], json!({"id": 7}));
        assert_eq!(value["coutReel"], 0.0);

        op.active = true;
        let payload = operation_payload(12, &op, None);
        assert_eq!(payload.statut, OperationStatut::Planifie);
        assert!(payload.created_by.is_none());
    }
}
