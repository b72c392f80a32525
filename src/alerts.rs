//! Alert resolution workflow. Every change sends the whole alert back and
//! returns the server's copy.

use crate::api::models::{Probleme, ProblemeStatut};
use crate::api::{ApiError, ForageClient};
use chrono::NaiveDate;
use log::info;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Please provide the implemented solution")]
    MissingSolution,

    #[error("Failed to update alert {id}: {source}")]
    Update {
        id: i64,
        #[source]
        source: ApiError,
    },
}

/// Set the status; settled statuses stamp the resolver and date, others clear them
pub fn apply_status(alert: &mut Probleme, status: ProblemeStatut, user_id: i64, today: NaiveDate) {
    alert.statut = Some(status);
    if status.is_settled() {
        alert.date_resolution = Some(today.format("%Y-%m-%d").to_string());
        alert.resolu_par = Some(json!({ "id": user_id }));
    } else {
        alert.date_resolution = None;
        alert.resolu_par = None;
    }
}

pub fn apply_assignment(alert: &mut Probleme, user_id: i64) {
    alert.statut = Some(ProblemeStatut::EnCours);
    alert.resolu_par = Some(json!({ "id": user_id }));
}

pub fn apply_resolution(
    alert: &mut Probleme,
    solution: &str,
    user_id: i64,
    today: NaiveDate,
) -> Result<(), AlertError> {
    let solution = solution.trim();
    if solution.is_empty() {
        return Err(AlertError::MissingSolution);
    }
    apply_status(alert, ProblemeStatut::Resolu, user_id, today);
    alert.solution_implemente = Some(solution.to_string());
    Ok(())
}

async fn send(client: &ForageClient, alert: &Probleme) -> Result<Probleme, AlertError> {
    client
        .problemes()
        .update(alert)
        .await
        .map_err(|source| AlertError::Update { id: alert.id, source })
}

pub async fn change_status(
    client: &ForageClient,
    mut alert: Probleme,
    status: ProblemeStatut,
    user_id: i64,
    today: NaiveDate,
) -> Result<Probleme, AlertError> {
    apply_status(&mut alert, status, user_id, today);
    let updated = send(client, &alert).await?;
    info!("Alert {} moved to {:?} by user {}", alert.id, status, user_id);
    Ok(updated)
}

pub async fn assign(client: &ForageClient, mut alert: Probleme, user_id: i64) -> Result<Probleme, AlertError> {
    apply_assignment(&mut alert, user_id);
    let updated = send(client, &alert).await?;
    info!("Alert {} assigned to user {}", alert.id, user_id);
    Ok(updated)
}

pub async fn resolve(
    client: &ForageClient,
    mut alert: Probleme,
    solution: &str,
    user_id: i64,
    today: NaiveDate,
) -> Result<Probleme, AlertError> {
    apply_resolution(&mut alert, solution, user_id, today)?;
    let updated = send(client, &alert).await?;
    info!("Alert {} resolved by user {}", alert.id, user_id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Probleme {
        serde_json::from_value(json!({
            "id": 9, "type": "DELAI", "statut": "OUVERT",
            "dateResolution": "2024-01-01", "resoluPar": {"id": 2}
        }))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_settled_status_stamps_resolver() {
        let mut alert = alert();
        apply_status(&mut alert, ProblemeStatut::Ferme, 7, today());
        assert_eq!(alert.date_resolution.as_deref(), Some("2024-06-03"));
        assert_eq!(alert.resolu_par, Some(json!({"id": 7})));

        apply_status(&mut alert, ProblemeStatut::Ouvert, 7, today());
        assert_eq!(alert.date_resolution, None);
        assert_eq!(alert.resolu_par, None);
        let wire = serde_json::to_value(&alert).unwrap();
        assert!(wire["dateResolution"].is_null());
    }

    #[test]
    fn test_assignment() {
        let mut alert = alert();
        apply_assignment(&mut alert, 4);
        assert_eq!(alert.statut, Some(ProblemeStatut::EnCours));
        assert_eq!(alert.resolu_par, Some(json!({"id": 4})));
    }

    #[test]
    fn test_resolution_requires_solution() {
        let mut alert = alert();
        let err = apply_resolution(&mut alert, "   ", 4, today()).unwrap_err();
        assert_eq!(err.to_string(), "Please provide the implemented solution");
        assert_eq!(alert.statut, Some(ProblemeStatut::Ouvert));

        apply_resolution(&mut alert, " Replaced pump ", 4, today()).unwrap();
        assert_eq!(alert.statut, Some(ProblemeStatut::Resolu));
        assert_eq!(alert.solution_implemente.as_deref(), Some("Replaced pump"));
        assert_eq!(alert.date_resolution.as_deref(), Some("2024-06-03"));
    }
}
