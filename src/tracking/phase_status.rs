use crate::api::models::Phase;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseStatus {
    NotStarted,
    Scheduled,
    InProgress,
    Completed,
}

impl PhaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            PhaseStatus::NotStarted => "Non commencé",
            PhaseStatus::Scheduled => "Planifié",
            PhaseStatus::InProgress => "En cours",
            PhaseStatus::Completed => "Terminé",
        }
    }
}

/// Real dates win over planned ones; planned dates are judged against `today`
pub fn phase_status(phase: &Phase, today: NaiveDate) -> PhaseStatus {
    if phase.date_fin_reelle.is_some() {
        return PhaseStatus::Completed;
    }
    if phase.date_debut_reelle.is_some() {
        return PhaseStatus::InProgress;
    }

    match (phase.date_debut_prevue, phase.date_fin_prevue) {
        (Some(start), _) if start > today => PhaseStatus::Scheduled,
        (Some(_), Some(end)) if end < today => PhaseStatus::Completed,
        (Some(_), _) => PhaseStatus::InProgress,
        (None, _) => PhaseStatus::NotStarted,
    }
}
