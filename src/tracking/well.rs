use crate::api::models::{Forage, Operation, Phase, Puit};
use crate::api::{ApiError, ForageClient};
use log::{debug, warn};

/// An operation with the label of the phase it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOperation {
    pub phase_id: i64,
    pub phase_label: String,
    pub operation: Operation,
}

/// A well with its active forage, phases and operations
#[derive(Debug, Clone)]
pub struct WellDetail {
    pub puit: Puit,
    pub forage: Option<Forage>,
    pub phases: Vec<Phase>,
    pub operations: Vec<PhaseOperation>,
}

impl WellDetail {
    pub async fn load(client: &ForageClient, puit_id: i64) -> Result<Self, ApiError> {
        let puit = client.puits().get(puit_id).await?;

        let forage = match client.forages().active_for_puit(puit_id).await {
            Ok(forage) => forage,
            Err(ApiError::Rejected { message }) => {
                debug!("No forage for well {}: {}", puit_id, message);
                None
            }
            Err(e) => return Err(e),
        };

        let phases = match &forage {
            Some(forage) => match client.phases().by_forage(forage.id).await {
                Ok(phases) => phases,
                Err(ApiError::Rejected { .. }) => Vec::new(),
                Err(e) => return Err(e),
            },
            None => Vec::new(),
        };

        let mut operations = Vec::new();
        for phase in &phases {
            match client.operations().by_phase(phase.id).await {
                Ok(ops) => {
                    let phase_label = phase.label();
                    operations.extend(ops.into_iter().map(|operation| PhaseOperation {
                        phase_id: phase.id,
                        phase_label: phase_label.clone(),
                        operation,
                    }));
                }
                Err(e) => warn!("Failed to fetch operations for phase {}: {}", phase.id, e),
            }
        }

        Ok(Self {
            puit,
            forage,
            phases,
            operations,
        })
    }

    /// Operations of one phase, or all of them
    pub fn operations_for(&self, phase_id: Option<i64>) -> Vec<&PhaseOperation> {
        self.operations
            .iter()
            .filter(|op| phase_id.is_none_or(|id| op.phase_id == id))
            .collect()
    }

    pub fn phase(&self, phase_id: i64) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    /// Planned and actual cost summed over the well's operations
    pub fn cost_totals(&self) -> (f64, f64) {
        self.operations.iter().fold((0.0, 0.0), |(planned, actual), op| {
            (
                planned + op.operation.cout_prev.unwrap_or(0.0),
                actual + op.operation.cout_reel.unwrap_or(0.0),
            )
        })
    }
}
