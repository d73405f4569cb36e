use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tradejournal(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tradejournal").unwrap();
    cmd.env("TRADEJOURNAL_DATA_DIR", dir.path())
        .env_remove("TRADEJOURNAL_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn as_user(dir: &TempDir) -> Command {
    let mut cmd = tradejournal(dir);
    cmd.args(["--user", "trader-1"]);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

/// First whitespace-separated token starting with `prefix`
fn token_with_prefix(text: &str, prefix: &str) -> String {
    text.split_whitespace()
        .find(|t| t.starts_with(prefix))
        .map(str::to_string)
        .unwrap_or_else(|| panic!("no {} token in:\n{}", prefix, text))
}

#[test]
fn test_requires_a_user() {
    let dir = TempDir::new().unwrap();
    tradejournal(&dir)
        .args(["account", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));
}

#[test]
fn test_config_sets_default_user() {
    let dir = TempDir::new().unwrap();
    tradejournal(&dir)
        .args(["config", "--set-user", "trader-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trader-1"));

    tradejournal(&dir)
        .args(["account", "create", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account: Demo"));
}

#[test]
fn test_trade_delete_and_recover() {
    let dir = TempDir::new().unwrap();
    as_user(&dir).args(["account", "create", "Demo"]).assert().success();

    as_user(&dir)
        .args(["trade", "add", "Demo", "eurusd", "long", "1.1", "1000", "--pnl", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EURUSD"));

    let listing = stdout_of(as_user(&dir).args(["trade", "list", "Demo"]));
    assert!(listing.contains("+50.00"));
    let trade_id = token_with_prefix(&listing, "trd-");

    let deleted = stdout_of(as_user(&dir).args(["trade", "delete", "Demo", &trade_id]));
    let entry_id = token_with_prefix(&deleted, "del-");

    as_user(&dir)
        .args(["trade", "list", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No trades found."));

    as_user(&dir)
        .args(["bin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo").and(predicate::str::contains("EURUSD")));

    as_user(&dir)
        .args(["bin", "recover", &entry_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered trade into Demo"));

    as_user(&dir)
        .args(["trade", "list", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(trade_id.as_str()));

    as_user(&dir)
        .args(["bin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recycle bin is empty."));
}

#[test]
fn test_trade_edit_keeps_entered_pnl_until_prices_move() {
    let dir = TempDir::new().unwrap();
    as_user(&dir).args(["account", "create", "Demo"]).assert().success();
    as_user(&dir)
        .args(["trade", "add", "Demo", "EURUSD", "long", "1.1", "1000", "--pnl", "50"])
        .assert()
        .success();
    let listing = stdout_of(as_user(&dir).args(["trade", "list", "Demo"]));
    let trade_id = token_with_prefix(&listing, "trd-");

    as_user(&dir)
        .args(["trade", "edit", "Demo", &trade_id, "--notes", "held through news"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net P&L: 50.00"));

    as_user(&dir)
        .args(["trade", "edit", "Demo", &trade_id, "--exit", "1.15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net P&L: 50.00"));

    as_user(&dir)
        .args(["trade", "edit", "Demo", &trade_id, "--reopen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net P&L: 0.00"));

    as_user(&dir)
        .args(["trade", "edit", "Demo", &trade_id, "--reopen", "--exit", "1.2"])
        .assert()
        .failure();
}

#[test]
fn test_purge_needs_force() {
    let dir = TempDir::new().unwrap();
    as_user(&dir).args(["account", "create", "Demo"]).assert().success();
    as_user(&dir)
        .args(["trade", "add", "Demo", "GBPUSD", "short", "1.25", "500"])
        .assert()
        .success();
    let listing = stdout_of(as_user(&dir).args(["trade", "list", "Demo"]));
    let trade_id = token_with_prefix(&listing, "trd-");
    let deleted = stdout_of(as_user(&dir).args(["trade", "delete", "Demo", &trade_id]));
    let entry_id = token_with_prefix(&deleted, "del-");

    as_user(&dir)
        .args(["bin", "purge", &entry_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    as_user(&dir)
        .args(["bin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GBPUSD"));

    as_user(&dir)
        .args(["bin", "purge", &entry_id, "--force"])
        .assert()
        .success();
    as_user(&dir)
        .args(["bin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recycle bin is empty."));
}

#[test]
fn test_backup_create_status_and_restore() {
    let dir = TempDir::new().unwrap();
    as_user(&dir).args(["account", "create", "Demo"]).assert().success();
    as_user(&dir)
        .args(["setup", "create", "Breakout", "-d", "Range break"])
        .assert()
        .success();

    as_user(&dir)
        .args(["backup", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A backup is due"));

    as_user(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Accounts: 1"));

    // last_backup_at is persisted across runs
    as_user(&dir)
        .args(["backup", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backup due."));

    as_user(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));

    as_user(&dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 1 account(s)"));

    as_user(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));
}

#[test]
fn test_audit_log_lists_actions() {
    let dir = TempDir::new().unwrap();
    as_user(&dir).args(["account", "create", "Demo"]).assert().success();
    as_user(&dir)
        .args(["note", "add", "Plan", "Only A+ setups"])
        .assert()
        .success();

    as_user(&dir)
        .args(["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("createAccount").and(predicate::str::contains("createNote")));
}

#[test]
fn test_unknown_account_is_reported() {
    let dir = TempDir::new().unwrap();
    as_user(&dir)
        .args(["trade", "list", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: Nope"));
}
