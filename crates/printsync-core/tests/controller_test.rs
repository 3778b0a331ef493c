#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` with a scripted PMC and a wiremock SysMan.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use printsync_api::pmc::NOT_LOGGED_IN;
use printsync_api::{ProcessOutput, ProcessRunner};
use printsync_core::{
    AccessLevel, Command, CommandResult, ConnectionState, Controller, ControllerConfig,
    CoreError, CreatePrinterRequest, CreateStatus, PmcCredentials, UpdatePrinterRequest,
};
use secrecy::SecretString;

// ── Fixtures ────────────────────────────────────────────────────────

const DRIVERS: &str = r#"[
    {
        "modelName": "HP Universal",
        "modelId": "drv-1",
        "modelVisible": 1,
    }
]"#;

const CONFIGURATIONS: &str = r#"[
    {
        "configfile_comment": "Duplex",
        "configfile_id": "cfg-1",
        "configfile_model": "HP Universal",
    }
]"#;

const DEPLOYMENTS: &str = r#"[
    {
        "mapOsId": "W1064",
        "mapModelId": "drv-1",
    }
]"#;

const REGIONS: &str = r#"[
    {
        "regionFullPath": "Region1",
        "regionId": 1,
    }
]"#;

const PRINTERS: &str = r#"[
    {
        "printerName": "SE_B1_F2_01",
        "printerId": "p-1",
        "printerLocation": "Room 101",
        "printerIp": "10.0.0.5",
        "region": 1,
        "printerComment": "Color",
        "printerModel": "drv-1",
    }
]"#;

const PRINTERS_WITH_UNSYNCED: &str = r#"[
    {
        "printerName": "SE_B1_F2_01",
        "printerId": "p-1",
        "printerLocation": "Room 101",
        "printerIp": "10.0.0.5",
        "region": 1,
        "printerComment": "Color",
        "printerModel": "drv-1",
    },
    {
        "printerName": "SE_B1_F2_03",
        "printerId": "p-3",
        "printerLocation": "Room 103",
        "printerIp": "10.0.0.7",
        "region": 1,
        "printerComment": "Mono",
        "printerModel": "drv-1",
    }
]"#;

/// Answers every invocation with canned stdout keyed on the leading
/// arguments, and records the argv it was called with.
#[derive(Default)]
struct ScriptedRunner {
    script: Vec<(Vec<String>, String)>,
    failing: Mutex<Vec<Vec<String>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    fn on(mut self, prefix: &[&str], stdout: &str) -> Self {
        self.script.push((
            prefix.iter().map(|s| (*s).to_owned()).collect(),
            stdout.to_owned(),
        ));
        self
    }

    /// A logged-in PMC with one driver, region and printer.
    fn directory() -> Self {
        Self::with_printers(PRINTERS)
    }

    fn with_printers(printers: &str) -> Self {
        Self::default()
            .on(&["model", "list"], DRIVERS)
            .on(&["configuration", "list"], CONFIGURATIONS)
            .on(&["deployment", "list"], DEPLOYMENTS)
            .on(&["region", "list"], REGIONS)
            .on(&["printer", "list"], printers)
            .on(&["queue", "list"], "")
    }

    /// From now on, invocations starting with `prefix` fail to spawn.
    fn fail(&self, prefix: &[&str]) {
        self.failing
            .lock()
            .unwrap()
            .push(prefix.iter().map(|s| (*s).to_owned()).collect());
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn was_called(&self, prefix: &[&str]) -> bool {
        self.calls()
            .iter()
            .any(|call| call.iter().map(String::as_str).take(prefix.len()).eq(prefix.iter().copied()))
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        _program: &'a Path,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<ProcessOutput, printsync_api::Error>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(args.to_vec());
            if self.failing.lock().unwrap().iter().any(|p| args.starts_with(p)) {
                return Err(printsync_api::Error::Spawn {
                    program: "pmc.exe".into(),
                    source: std::io::Error::other("scripted failure"),
                });
            }
            let stdout = self
                .script
                .iter()
                .find(|(prefix, _)| args.starts_with(prefix))
                .map(|(_, out)| out.clone())
                .unwrap_or_default();
            Ok(ProcessOutput::from_stdout(stdout))
        })
    }
}

/// Any path that exists as a file stands in for the PMC executable.
fn pmc_path() -> PathBuf {
    std::env::current_exe().unwrap()
}

async fn sysman_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Printer/Active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "name": "SE_B1_F2_01",
                "id": 11,
                "description": "Color",
                "location": "Room 101",
                "server": "Cirrato",
                "tag": "",
                "canBeDefault": true,
                "canBeRemoved": false
            }],
            "total": 1
        })))
        .mount(&server)
        .await;

    server
}

fn config(server: &MockServer) -> ControllerConfig {
    ControllerConfig::new(pmc_path(), Url::parse(&server.uri()).unwrap())
}

async fn connected(
    server: &MockServer,
    runner: ScriptedRunner,
) -> (Controller, Arc<ScriptedRunner>) {
    let runner = Arc::new(runner);
    let controller = Controller::with_runner(config(server), runner.clone());
    controller.connect().await.unwrap();
    (controller, runner)
}

fn create_request(name: &str, ip: &str) -> CreatePrinterRequest {
    CreatePrinterRequest {
        name: name.into(),
        region: "Region1".into(),
        ip: ip.into(),
        driver: "HP Universal".into(),
        configuration: Some("Duplex".into()),
        description: "Mono".into(),
        location: "Room 102".into(),
        create_in_sysman: true,
    }
}

// ── Connect ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_loads_and_reconciles_directory() {
    let server = sysman_server().await;
    let (controller, _) = connected(&server, ScriptedRunner::directory()).await;

    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Connected
    );
    assert_eq!(controller.access_level(), AccessLevel::Full);

    let printers = controller.printers_snapshot();
    assert_eq!(printers.len(), 1);
    let printer = &printers[0];
    assert_eq!(printer.name, "SE_B1_F2_01");
    assert_eq!(printer.driver_name(), "HP Universal");
    assert_eq!(printer.region_name(), "Region1");
    assert!(printer.exists_in_sysman);
    assert_eq!(printer.sysman_id, "11");

    let drivers = controller.drivers_snapshot();
    assert_eq!(drivers[0].configurations[0].name, "Duplex");
    assert_eq!(drivers[0].deployed_os, vec!["W1064"]);
    assert_eq!(controller.sysman_printers_snapshot().len(), 1);

    controller.disconnect().await;
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Disconnected
    );
}

#[tokio::test]
async fn test_not_logged_in_requires_login() {
    let server = sysman_server().await;
    let runner = Arc::new(ScriptedRunner::default().on(&["model", "list"], NOT_LOGGED_IN));
    let controller = Controller::with_runner(config(&server), runner.clone());

    let result = controller.connect().await;
    assert!(
        matches!(result, Err(CoreError::LoginRequired)),
        "expected LoginRequired, got: {result:?}"
    );
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Failed
    );
    assert!(!runner.was_called(&["printer", "list"]));
}

#[tokio::test]
async fn test_pmc_error_on_login_check_stops_connect() {
    let server = sysman_server().await;
    let runner =
        Arc::new(ScriptedRunner::default().on(&["model", "list"], "[ERROR] License expired."));
    let controller = Controller::with_runner(config(&server), runner.clone());

    let result = controller.connect().await;
    match result {
        Err(CoreError::Pmc { message }) => assert_eq!(message, "License expired."),
        other => panic!("expected Pmc error, got: {other:?}"),
    }
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Failed
    );
    assert!(!runner.was_called(&["configuration", "list"]));
    assert!(!runner.was_called(&["printer", "list"]));
}

#[tokio::test]
async fn test_connect_logs_in_with_configured_credentials() {
    let server = sysman_server().await;
    let runner = ScriptedRunner::default()
        .on(&["model", "list", "--verbose"], DRIVERS)
        .on(&["model", "list"], NOT_LOGGED_IN)
        .on(&["login"], "[OK] Login successful.")
        .on(&["configuration", "list"], CONFIGURATIONS)
        .on(&["deployment", "list"], DEPLOYMENTS)
        .on(&["region", "list"], REGIONS)
        .on(&["printer", "list"], PRINTERS)
        .on(&["queue", "list"], "");
    let runner = Arc::new(runner);
    let mut cfg = config(&server);
    cfg.pmc_credentials = Some(PmcCredentials {
        domain: "CORP".into(),
        username: "svc-print".into(),
        password: SecretString::from("hunter2"),
    });
    let controller = Controller::with_runner(cfg, runner.clone());

    controller.connect().await.unwrap();

    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Connected
    );
    assert!(runner.was_called(&["login", "-d", "CORP", "-u", "svc-print"]));
    let calls = runner.calls();
    let login_at = calls.iter().position(|c| c[0] == "login").unwrap();
    let listing_at = calls
        .iter()
        .position(|c| c.starts_with(&["printer".to_owned(), "list".to_owned()]))
        .unwrap();
    assert!(login_at < listing_at);
    assert_eq!(controller.printers_snapshot().len(), 1);
}

#[tokio::test]
async fn test_missing_pmc_executable() {
    let server = sysman_server().await;
    let mut cfg = config(&server);
    cfg.pmc_path = PathBuf::from("/nonexistent/cirrato/pmc.exe");
    let controller = Controller::with_runner(cfg, Arc::new(ScriptedRunner::directory()));

    let result = controller.connect().await;
    assert!(
        matches!(result, Err(CoreError::PmcNotFound { .. })),
        "expected PmcNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_sysman() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let controller = Controller::with_runner(config(&server), Arc::new(ScriptedRunner::directory()));

    let result = controller.connect().await;
    assert!(
        matches!(result, Err(CoreError::SysManUnavailable { .. })),
        "expected SysManUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_read_only_session_rejects_commands() {
    let server = sysman_server().await;
    let runner = Arc::new(ScriptedRunner::directory().on(&["-Gn"], "users staff\n").on(
        &["/groups"],
        "\"CORP\\Domain Users\",\"Group\",\"S-1-5-21\",\"Enabled group\"\r\n",
    ));
    let mut cfg = config(&server);
    cfg.access_group = "CN=Printer Admins,OU=Groups,DC=corp".into();
    let controller = Controller::with_runner(cfg, runner.clone());
    controller.connect().await.unwrap();

    assert_eq!(controller.access_level(), AccessLevel::ReadOnly);
    let result = controller
        .execute(Command::DeletePrinter {
            name: "SE_B1_F2_01".into(),
        })
        .await;
    assert!(
        matches!(result, Err(CoreError::ReadOnly { .. })),
        "expected ReadOnly, got: {result:?}"
    );
    assert!(!runner.was_called(&["printer", "delete"]));
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_printer_round_trip() {
    let server = sysman_server().await;
    Mock::given(method("POST"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;

    let runner = ScriptedRunner::directory()
        .on(&["printer", "add"], "[OK] \"p-2\"")
        .on(&["queue", "modify"], "[OK] Queue modified.");
    let (controller, runner) = connected(&server, runner).await;

    let result = controller
        .execute(Command::CreatePrinter(create_request("SE_B1_F2_02", "10.0.0.6")))
        .await
        .unwrap();
    let CommandResult::Created(report) = result else {
        panic!("expected Created, got: {result:?}");
    };

    assert_eq!(report.status, CreateStatus::Both);
    assert_eq!(report.status.message(), "Created printer in Cirrato and SysMan!");
    assert!(report.errors.is_empty());

    let printer = report.printer.unwrap();
    assert_eq!(printer.cirrato_id, "p-2");
    assert!(printer.exists_in_sysman);
    assert_eq!(printer.sysman_id, "42");
    assert_eq!(printer.configuration.as_deref(), Some("Duplex"));
    assert_eq!(report.sysman_printer.unwrap().server, "Cirrato");

    assert_eq!(controller.printers_snapshot().len(), 2);
    assert!(runner.calls().contains(&vec![
        "queue".to_owned(),
        "modify".into(),
        "--target".into(),
        "Region1\\SE_B1_F2_02".into(),
        "-ac".into(),
        "W1064:cfg-1".into(),
    ]));
}

#[tokio::test]
async fn test_create_reports_cirrato_only_when_sysman_rejects() {
    let server = sysman_server().await;
    Mock::given(method("POST"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Printer already exists"))
        .mount(&server)
        .await;

    let runner = ScriptedRunner::directory()
        .on(&["printer", "add"], "[OK] \"p-2\"")
        .on(&["queue", "modify"], "[OK] Queue modified.");
    let (controller, _) = connected(&server, runner).await;

    let result = controller
        .execute(Command::CreatePrinter(create_request("SE_B1_F2_02", "10.0.0.6")))
        .await
        .unwrap();
    let CommandResult::Created(report) = result else {
        panic!("expected Created, got: {result:?}");
    };

    assert_eq!(report.status, CreateStatus::CirratoOnly);
    assert_eq!(
        report.errors,
        vec!["Failed to create printer in SysMan! SysMan response: Printer already exists"]
    );
    assert!(!report.printer.unwrap().exists_in_sysman);
}

#[tokio::test]
async fn test_create_keeps_report_when_queue_step_fails() {
    let server = sysman_server().await;
    Mock::given(method("POST"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;

    let runner = ScriptedRunner::directory().on(&["printer", "add"], "[OK] \"p-2\"");
    let (controller, runner) = connected(&server, runner).await;
    runner.fail(&["queue", "modify"]);

    let result = controller
        .execute(Command::CreatePrinter(create_request("SE_B1_F2_02", "10.0.0.6")))
        .await
        .unwrap();
    let CommandResult::Created(report) = result else {
        panic!("expected Created, got: {result:?}");
    };

    assert_eq!(report.status, CreateStatus::SysManOnly);
    assert_eq!(report.errors.len(), 1);
    assert!(
        report.errors[0].starts_with(
            "Failed to add configuration Duplex for operating systems W1064 to printer queue SE_B1_F2_02 in Cirrato!"
        ),
        "unexpected error: {}",
        report.errors[0]
    );

    let printer = report.printer.unwrap();
    assert_eq!(printer.cirrato_id, "p-2");
    assert!(printer.exists_in_sysman);
    assert_eq!(controller.printers_snapshot().len(), 2);
}

#[tokio::test]
async fn test_create_with_taken_ip_fails_validation_before_any_call() {
    let server = sysman_server().await;
    let (controller, runner) = connected(&server, ScriptedRunner::directory()).await;

    let result = controller
        .execute(Command::CreatePrinter(create_request("SE_B1_F2_02", "10.0.0.5")))
        .await;
    match result {
        Err(CoreError::ValidationFailed { message }) => {
            assert_eq!(message, "IP already in use by printer SE_B1_F2_01.");
        }
        other => panic!("expected ValidationFailed, got: {other:?}"),
    }
    assert!(!runner.was_called(&["printer", "add"]));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_reports_queue_failure() {
    let server = sysman_server().await;
    let runner = ScriptedRunner::directory()
        .on(&["printer", "modify"], "[OK] Printer modified.")
        .on(&["queue", "modify"], "[ERROR] Queue not found.");
    let (controller, runner) = connected(&server, runner).await;

    let request = UpdatePrinterRequest {
        location: Some("Room 103".into()),
        ..UpdatePrinterRequest::new("SE_B1_F2_01")
    };
    let result = controller
        .execute(Command::UpdatePrinter(request))
        .await
        .unwrap();
    let CommandResult::Updated(report) = result else {
        panic!("expected Updated, got: {result:?}");
    };

    assert_eq!(report.changes, vec!["Location (Cirrato): Room 101 > Room 103"]);
    assert!(report.cirrato_updated);
    assert!(!report.sysman_updated);
    assert_eq!(
        report.errors,
        vec!["Modified printer, but could not modify queue in Cirrato! [ERROR] Queue not found."]
    );
    assert!(runner.was_called(&["printer", "modify", "--id", "p-1"]));
}

#[tokio::test]
async fn test_update_sysman_fields_only() {
    let server = sysman_server().await;
    Mock::given(method("PUT"))
        .and(path("/api/Printer"))
        .and(body_json(json!({
            "Id": 11,
            "Name": "SE_B1_F2_01",
            "Server": "Cirrato",
            "Description": "Color",
            "Location": "Lobby",
            "canBeDefault": true,
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;
    let (controller, runner) = connected(&server, ScriptedRunner::directory()).await;

    let request = UpdatePrinterRequest {
        sysman_location: Some("Lobby".into()),
        ..UpdatePrinterRequest::new("SE_B1_F2_01")
    };
    let result = controller
        .execute(Command::UpdatePrinter(request))
        .await
        .unwrap();
    let CommandResult::Updated(report) = result else {
        panic!("expected Updated, got: {result:?}");
    };

    assert!(report.sysman_updated);
    assert!(!report.cirrato_updated);
    assert!(!runner.was_called(&["printer", "modify"]));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_removes_from_both_backends() {
    let server = sysman_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Printer"))
        .and(body_json(json!({ "Id": 11 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let runner = ScriptedRunner::directory().on(&["printer", "delete"], "[OK] Printer deleted.");
    let (controller, runner) = connected(&server, runner).await;

    let result = controller
        .execute(Command::DeletePrinter {
            name: "SE_B1_F2_01".into(),
        })
        .await
        .unwrap();
    let CommandResult::Deleted(report) = result else {
        panic!("expected Deleted, got: {result:?}");
    };

    assert!(report.cirrato_deleted);
    assert_eq!(report.sysman_deleted, Some(true));
    assert!(report.errors.is_empty());
    assert!(runner.was_called(&["printer", "delete", "--id", "p-1"]));
}

#[tokio::test]
async fn test_delete_unknown_printer() {
    let server = sysman_server().await;
    let (controller, _) = connected(&server, ScriptedRunner::directory()).await;

    let result = controller
        .execute(Command::DeletePrinter {
            name: "Nope".into(),
        })
        .await;
    assert!(
        matches!(result, Err(CoreError::PrinterNotFound { .. })),
        "expected PrinterNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_reports_failed_reload() {
    let server = sysman_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Printer"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let runner = ScriptedRunner::directory().on(&["printer", "delete"], "[OK] Printer deleted.");
    let (controller, runner) = connected(&server, runner).await;
    runner.fail(&["printer", "list"]);

    let result = controller
        .execute(Command::DeletePrinter {
            name: "SE_B1_F2_01".into(),
        })
        .await
        .unwrap();
    let CommandResult::Deleted(report) = result else {
        panic!("expected Deleted, got: {result:?}");
    };

    assert!(report.cirrato_deleted);
    assert_eq!(report.sysman_deleted, Some(true));
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Failed to reload printers!"));
}

// ── SysMan registration ─────────────────────────────────────────────

#[tokio::test]
async fn test_create_in_sysman_registers_cirrato_printer() {
    let server = sysman_server().await;
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
        .respond_with(ResponseTemplate::new(200).set_body_string("43"))
        .expect(1)
        .mount(&server)
        .await;
    let runner = ScriptedRunner::with_printers(PRINTERS_WITH_UNSYNCED);
    let (controller, _) = connected(&server, runner).await;

    let before = controller.printers_snapshot();
    let unsynced = before.iter().find(|p| p.name == "SE_B1_F2_03").unwrap();
    assert!(!unsynced.exists_in_sysman);

    let result = controller
        .execute(Command::CreateInSysMan {
            name: "SE_B1_F2_03".into(),
        })
        .await
        .unwrap();
    let CommandResult::SysManCreated { printer } = result else {
        panic!("expected SysManCreated, got: {result:?}");
    };
    assert_eq!(printer.id, 43);
    assert_eq!(printer.server, "Cirrato");

    let after = controller.printers_snapshot();
    let synced = after.iter().find(|p| p.name == "SE_B1_F2_03").unwrap();
    assert!(synced.exists_in_sysman);
    assert_eq!(synced.sysman_id, "43");
    assert_eq!(controller.sysman_printers_snapshot().len(), 2);
}

#[tokio::test]
async fn test_create_in_sysman_rejects_existing_entry() {
    let server = sysman_server().await;
    let (controller, _) = connected(&server, ScriptedRunner::directory()).await;

    let result = controller
        .execute(Command::CreateInSysMan {
            name: "SE_B1_F2_01".into(),
        })
        .await;
    assert!(
        matches!(result, Err(CoreError::ValidationFailed { .. })),
        "expected ValidationFailed, got: {result:?}"
    );
}
