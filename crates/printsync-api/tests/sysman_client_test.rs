#![allow(clippy::unwrap_used)]
// Integration tests for `SysManClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use printsync_api::sysman::{is_delete_success, parse_created_id};
use printsync_api::{Error, SysManClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SysManClient) {
    let server = MockServer::start().await;
    let client = SysManClient::with_client(&server.uri(), reqwest::Client::new(), None).unwrap();
    (server, client)
}

// ── Health check ────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_check_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.health_check().await.unwrap();
}

#[tokio::test]
async fn test_health_check_rejects_non_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client.health_check().await;
    assert!(
        matches!(result, Err(Error::SysMan { status: 204, .. })),
        "expected SysMan error, got: {result:?}"
    );
}

// ── Printer listing ─────────────────────────────────────────────────

#[tokio::test]
async fn test_list_all_printers_reads_first_array_property() {
    let (server, client) = setup().await;

    let envelope = json!({
        "result": [
            {
                "name": "SE_B1_F2_01",
                "id": 11,
                "description": "Color",
                "location": "Room 101",
                "server": "Cirrato",
                "tag": null,
                "canBeDefault": true,
                "canBeRemoved": false
            },
            {
                "Name": "SE_B1_F2_02",
                "Id": 12,
                "Description": null,
                "Location": "Room 102",
                "Server": "Cirrato",
                "Tag": "",
                "CanBeDefault": false,
                "CanBeRemoved": true
            }
        ],
        "total": 2
    });

    Mock::given(method("GET"))
        .and(path("/api/Printer/Active"))
        .and(query_param("name", "%"))
        .and(query_param("take", "10000"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let printers = client.list_all_printers().await.unwrap();
    assert_eq!(printers.len(), 2);
    assert_eq!(printers[0].name, "SE_B1_F2_01");
    assert_eq!(printers[0].id, 11);
    assert_eq!(printers[0].location.as_deref(), Some("Room 101"));
    assert_eq!(printers[1].name, "SE_B1_F2_02");
    assert_eq!(printers[1].description, None);
    assert!(printers[1].can_be_removed);
}

#[tokio::test]
async fn test_list_all_printers_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/Printer/Active"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_all_printers().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_all_printers_server_error_keeps_preview() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/Printer/Active"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let err = client.list_all_printers().await.unwrap_err();
    match err {
        Error::SysMan { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("expected SysMan error, got: {other:?}"),
    }
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_printer_returns_id_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/Printer"))
        .and(body_json(json!({
            "Name": "SE_B1_F2_03",
            "Server": "Cirrato",
            "Description": "Mono",
            "Location": "Room 103",
            "canBeDefault": true,
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;

    let body = client
        .create_printer("SE_B1_F2_03", "Mono", "Room 103")
        .await
        .unwrap();
    assert_eq!(parse_created_id(&body), Some(42));
}

#[tokio::test]
async fn test_create_printer_non_numeric_body_is_not_an_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"Printer exists\""))
        .mount(&server)
        .await;

    let body = client.create_printer("P", "d", "l").await.unwrap();
    assert_eq!(parse_created_id(&body), None);
}

#[tokio::test]
async fn test_modify_printer_sends_id() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/Printer"))
        .and(body_json(json!({
            "Id": 11,
            "Name": "SE_B1_F2_01",
            "Server": "Cirrato",
            "Description": "Color",
            "Location": "Room 201",
            "canBeDefault": true,
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .modify_printer(11, "SE_B1_F2_01", "Color", "Room 201")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_printer_empty_body_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Printer"))
        .and(body_json(json!({ "Id": 11 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let body = client.delete_printer(11).await.unwrap();
    assert!(is_delete_success(&body));
}

#[tokio::test]
async fn test_delete_printer_message_body_is_failure() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Printer is in use"))
        .mount(&server)
        .await;

    let body = client.delete_printer(11).await.unwrap();
    assert!(!is_delete_success(&body));
}

// ── Installation targets ────────────────────────────────────────────

#[tokio::test]
async fn test_installation_targets_drop_blanks_and_duplicates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/Printer/GetTargetsWithPrinterInstalled"))
        .and(query_param("printerName", "SE_B1_F2_01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "displayName": "PC-002" },
            { "displayName": "" },
            { "displayName": "PC-001" },
            { "displayName": null },
            { "displayName": "PC-002" }
        ])))
        .mount(&server)
        .await;

    let targets = client.installation_targets("SE_B1_F2_01").await.unwrap();
    assert_eq!(targets, vec!["PC-002", "PC-001"]);
}
