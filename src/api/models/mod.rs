//! Wire models for the drilling backend

pub mod daily_report;
pub mod dashboard;
pub mod dates;
pub mod indicateur;
pub mod operation;
pub mod phase;
pub mod probleme;
pub mod puit;
pub mod utilisateur;

pub use daily_report::{DailyReport, DailyReportPayload};
pub use dashboard::{CostlyOperation, DashboardData, Overruns, PhaseCost, TotalPhasesCost};
pub use indicateur::{IndicateurPayload, TypeIndicateur};
pub use operation::{Operation, OperationPayload, OperationStatut, TypeOperation};
pub use phase::{Diametre, Phase, PhasePayload};
pub use probleme::{Gravite, ProblemDetectionRequest, Probleme, ProblemeStatut, ProblemeType};
pub use puit::{Forage, Puit};
pub use utilisateur::{LoginData, LoginRequest, REGISTRATION_ROLES, RegisterRequest, Role, Utilisateur};

use serde::{Deserialize, Serialize};

/// `{ "id": n }`, how the backend links records; extra fields are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}
