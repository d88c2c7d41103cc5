//! End-to-end CLI tests against the local backend.

use assert_cmd::Command;
use kishop::server::router;
use kishop::storage::SqliteStorage;
use serde_json::Value;
use std::fs;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

fn kishop(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kishop").unwrap();
    cmd.env("KISHOP_CONFIG", dir.path().join("config.json"))
        .env("KISHOP_LOCAL_DIR", dir.path().join("local"))
        .env("KISHOP_BACKEND", "local")
        .env_remove("KISHOP_API_URL")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn json_out(dir: &TempDir, args: &[&str]) -> Value {
    let output = kishop(dir)
        .args(args)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}

/// Serve an in-memory API on its own thread; returns the base URL.
fn spawn_server() -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            let storage = SqliteStorage::open_memory().unwrap();
            axum::serve(listener, router(storage)).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn write_legacy(dir: &TempDir) -> std::path::PathBuf {
    let local = dir.path().join("local");
    fs::create_dir_all(&local).unwrap();
    let path = local.join("kishop_data.json");
    fs::write(
        &path,
        r#"{"maxBudget":50,"items":[{"quantity":"1","price":"2.00"}]}"#,
    )
    .unwrap();
    path
}

fn close(actual: &Value, expected: f64) -> bool {
    (actual.as_f64().unwrap() - expected).abs() < 1e-9
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = kishop(&dir).arg("version").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.starts_with("kishop version "));
}

#[test]
fn test_empty_list_message() {
    let dir = TempDir::new().unwrap();
    let output = kishop(&dir).args(["item", "list"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("Start adding items to your shopping list"));
    assert!(stdout.contains("Budget:     not set"));
}

#[test]
fn test_add_fills_entry_row_and_opens_next() {
    let dir = TempDir::new().unwrap();
    let list = json_out(&dir, &["item", "add", "--quantity", "2", "--price", "3.00"]);

    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], "2");
    assert_eq!(items[0]["price"], "3.00");
    assert_eq!(items[1]["quantity"], "1");
    assert_eq!(items[1]["price"], "");

    let totals = &list["totals"];
    assert!(close(&totals["totalQty"], 2.0));
    assert!(close(&totals["subtotal"], 6.0));
    assert!(close(&totals["tax"], 0.69));
    assert!(close(&totals["grandTotal"], 6.69));
    assert_eq!(list["backend"], "local");
}

#[test]
fn test_budget_status_follows_spend() {
    let dir = TempDir::new().unwrap();
    json_out(&dir, &["item", "add", "-n", "2", "-p", "3.00"]);

    let budget = json_out(&dir, &["budget", "set", "10"]);
    assert!(close(&budget["maxBudget"], 10.0));
    assert_eq!(budget["status"], "neutral");

    json_out(&dir, &["budget", "set", "7"]);
    assert_eq!(json_out(&dir, &["totals"])["status"], "approaching");

    json_out(&dir, &["budget", "set", "6"]);
    assert_eq!(json_out(&dir, &["totals"])["status"], "over");

    let cleared = json_out(&dir, &["budget", "set", "abc"]);
    assert!(close(&cleared["maxBudget"], 0.0));
    assert_eq!(cleared["status"], "neutral");
}

#[test]
fn test_set_and_delete_rows() {
    let dir = TempDir::new().unwrap();
    json_out(&dir, &["item", "add", "-n", "1", "-p", "4.00"]);

    let list = json_out(&dir, &["item", "set", "1", "--quantity", "3"]);
    assert_eq!(list["items"][0]["quantity"], "3");
    assert!(close(&list["totals"]["subtotal"], 12.0));

    let list = json_out(&dir, &["item", "delete", "1"]);
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price"], "");
}

#[test]
fn test_bad_row_number_fails() {
    let dir = TempDir::new().unwrap();
    json_out(&dir, &["item", "add", "-p", "1.00"]);

    let output = kishop(&dir)
        .args(["item", "delete", "9"])
        .assert()
        .failure()
        .code(3);
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("No row 9 (list has 2 rows)"));
    assert!(stderr.contains("Row numbers run 1..=2."));

    kishop(&dir)
        .args(["item", "delete", "0"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_quiet_hides_text_errors_only() {
    let dir = TempDir::new().unwrap();
    json_out(&dir, &["item", "add", "-p", "1.00"]);

    let output = kishop(&dir)
        .args(["-q", "item", "delete", "9"])
        .assert()
        .failure()
        .code(3);
    assert!(output.get_output().stderr.is_empty());

    let output = kishop(&dir)
        .args(["-q", "--json", "item", "delete", "9"])
        .assert()
        .failure()
        .code(3);
    let error: Value = serde_json::from_slice(&output.get_output().stderr).unwrap();
    assert_eq!(error["error"]["code"], "INDEX_OUT_OF_RANGE");

    // command output still goes to stdout
    let output = kishop(&dir).args(["-q", "totals"]).assert().success();
    assert!(!output.get_output().stdout.is_empty());
}

#[test]
fn test_clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    json_out(&dir, &["item", "add", "-n", "2", "-p", "1.50"]);

    kishop(&dir)
        .args(["item", "clear"])
        .assert()
        .failure()
        .code(4);

    let list = json_out(&dir, &["item", "clear", "--yes"]);
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], "1");
    assert!(close(&list["totals"]["subtotal"], 0.0));
}

#[test]
fn test_settings_file_selects_quantity_policy() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"quantityPolicy":"all-rows"}"#,
    )
    .unwrap();

    let list = json_out(&dir, &["item", "add", "-n", "2", "-p", "3.00"]);
    // the open entry row's default quantity counts too
    assert!(close(&list["totals"]["totalQty"], 3.0));
}

#[test]
fn test_invalid_settings_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), "{not json").unwrap();

    kishop(&dir).arg("totals").assert().failure().code(7);
}

#[test]
fn test_legacy_snapshot_loads_on_local_backend() {
    let dir = TempDir::new().unwrap();
    write_legacy(&dir);

    let list = json_out(&dir, &["item", "list"]);
    assert!(close(&list["maxBudget"], 50.0));
    assert_eq!(list["items"][0]["price"], "2.00");
    assert!(list["items"][0]["id"].is_i64());
}

#[test]
fn test_remote_start_migrates_before_first_load() {
    let dir = TempDir::new().unwrap();
    let legacy = write_legacy(&dir);
    let base = spawn_server();
    let remote = ["--backend", "remote", "--api-url", base.as_str(), "item", "list"];

    let list = json_out(&dir, &remote);
    assert_eq!(list["backend"], "remote");
    assert!(close(&list["maxBudget"], 50.0));
    assert_eq!(list["items"][0]["quantity"], "1");
    assert_eq!(list["items"][0]["price"], "2.00");
    assert!(close(&list["totals"]["subtotal"], 2.0));
    assert!(!legacy.exists());

    let again = json_out(&dir, &remote);
    assert_eq!(again["items"], list["items"]);
}

#[test]
fn test_unreachable_server_keeps_legacy_data() {
    let dir = TempDir::new().unwrap();
    let legacy = write_legacy(&dir);
    // a port nothing listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let base = format!("http://{addr}");

    kishop(&dir)
        .args(["--backend", "remote", "--api-url", base.as_str()])
        .args(["item", "list"])
        .assert()
        .failure()
        .code(6);
    assert!(legacy.exists());
}
