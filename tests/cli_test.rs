use assert_cmd::Command;
use predicates::str::contains;
use std::sync::{Mutex, MutexGuard};

// Scripts written by one test must not leak into a child forked by another.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

fn fpmon(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("fpmon").unwrap();
    cmd.env("FPMON_CONFIG_DIR", config_dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_hosts_is_an_error() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    fpmon(dir.path())
        .arg("--no-color")
        .assert()
        .code(3)
        .stderr(contains("Error: no hosts to monitor"));
}

#[test]
fn test_missing_fping_binary() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    fpmon(dir.path())
        .args(["--no-color", "--fping", "/nonexistent/fping", "localhost"])
        .assert()
        .code(2)
        .stderr(contains("fping not found"));
}

#[test]
fn test_bad_config_format() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nformat = \"xml\"\n",
    )
    .unwrap();
    fpmon(dir.path())
        .arg("localhost")
        .assert()
        .code(1)
        .stderr(contains("unknown format 'xml'"));
}

#[test]
fn test_broken_config_file() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[defaults\n").unwrap();
    fpmon(dir.path())
        .arg("localhost")
        .assert()
        .code(1)
        .stderr(contains("invalid config file"));
}

#[cfg(unix)]
#[test]
fn test_records_and_stats_from_fake_fping() {
    use std::os::unix::fs::PermissionsExt;

    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fping");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         echo 'gw : xmt/rcv/%loss = 4/4/0%, min/avg/max = 0.50/0.75/1.00' >&2\n\
         echo 'down : xmt/rcv/%loss = 4/0/100%' >&2\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    fpmon(dir.path())
        .arg("--no-color")
        .arg("--fping")
        .arg(&script)
        .args(["gw", "down"])
        .assert()
        .success()
        .stdout(contains("gw loss:   0% min/avg/max: 0.500/0.750/1.000 ms"))
        .stdout(contains("down loss: 100% min/avg/max: -"))
        .stderr(contains("Stats down 1 records, loss 100%, no replies"));
}

#[cfg(all(unix, feature = "json"))]
#[test]
fn test_json_lines_from_fake_fping() {
    use std::os::unix::fs::PermissionsExt;

    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fping");
    std::fs::write(
        &script,
        "#!/bin/sh\necho 'gw : xmt/rcv/%loss = 4/3/25%, min/avg/max = 0.50/0.75/1.00' >&2\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    fpmon(dir.path())
        .arg("--json")
        .arg("--no-stats")
        .arg("--fping")
        .arg(&script)
        .arg("gw")
        .assert()
        .success()
        .stdout(contains("\"host\":\"gw\""))
        .stdout(contains("\"loss_percent\":25"))
        .stdout(contains("\"avg_ms\":0.75"));
}

#[cfg(feature = "fping-tests")]
#[test]
fn test_real_fping_localhost() {
    use std::time::Duration;

    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    fpmon(dir.path())
        .args(["--json", "--summary", "1", "--period", "200", "127.0.0.1"])
        .timeout(Duration::from_secs(3))
        .assert()
        .stdout(contains("\"host\":\"127.0.0.1\""));
}
