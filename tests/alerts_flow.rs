mod common;

use chrono::NaiveDate;
use common::{ok, rejected};
use forage_cli::alerts::{self, AlertError};
use forage_cli::api::models::{Probleme, ProblemeStatut};
use mockito::{Matcher, Server};
use serde_json::json;

fn alert() -> Probleme {
    serde_json::from_value(json!({
        "id": 12,
        "type": "COUT",
        "gravite": "MAJEUR",
        "statut": "OUVERT",
        "description": "Cost above plan",
        "operation": {"id": 40, "description": "Cementing"},
        "seuilDepasse": 15.5
    }))
    .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

#[tokio::test]
async fn test_resolve_sends_whole_alert() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/problemes/12")
        .match_body(Matcher::PartialJson(json!({
            "id": 12,
            "type": "COUT",
            "statut": "RESOLU",
            "dateResolution": "2024-06-03",
            "resoluPar": {"id": 5},
            "solutionImplemente": "Renegotiated the rig rate",
            "operation": {"id": 40, "description": "Cementing"},
            "seuilDepasse": 15.5
        })))
        .with_body(ok(json!({"id": 12, "statut": "RESOLU"})))
        .expect(1)
        .create_async()
        .await;

    let client = common::client(&server);
    let updated = alerts::resolve(&client, alert(), "  Renegotiated the rig rate ", 5, today())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(updated.statut, Some(ProblemeStatut::Resolu));
}

#[tokio::test]
async fn test_blank_solution_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = common::client(&server);
    let err = alerts::resolve(&client, alert(), "   ", 5, today()).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, AlertError::MissingSolution));
}

#[tokio::test]
async fn test_reopen_clears_resolution() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/problemes/12")
        .match_body(Matcher::PartialJson(json!({
            "statut": "OUVERT",
            "dateResolution": null,
            "resoluPar": null
        })))
        .with_body(ok(json!({"id": 12, "statut": "OUVERT"})))
        .create_async()
        .await;

    let mut settled = alert();
    settled.statut = Some(ProblemeStatut::Ferme);
    settled.date_resolution = Some("2024-05-01".into());
    settled.resolu_par = Some(json!({"id": 2}));

    let client = common::client(&server);
    alerts::change_status(&client, settled, ProblemeStatut::Ouvert, 5, today())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_assign_failure_names_alert() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/problemes/12")
        .match_body(Matcher::PartialJson(json!({"statut": "EN_COURS", "resoluPar": {"id": 8}})))
        .with_body(rejected("Alert is locked"))
        .create_async()
        .await;

    let client = common::client(&server);
    let err = alerts::assign(&client, alert(), 8).await.unwrap_err();
    match &err {
        AlertError::Update { id, source } => {
            assert_eq!(*id, 12);
            assert!(source.is_rejection());
            assert_eq!(source.server_message(), "Alert is locked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
