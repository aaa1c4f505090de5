#![cfg(unix)]
//! Sessions against a stand-in fping script.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use fpmon::{ChannelSink, FpingOptions, StreamEnd, monitor};
use tokio::sync::mpsc;

// Writing then exec'ing a script while another test forks can hit ETXTBSY.
static SPAWN: Mutex<()> = Mutex::new(());

fn fake_fping(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fping");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn session_streams_stderr_until_fping_exits() {
    let _guard = SPAWN.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let args_file = dir.path().join("args");
    let script = fake_fping(
        dir.path(),
        &format!(
            "printf '%s ' \"$@\" > {args}\n\
             echo '[12:00:10]' >&2\n\
             echo 'fake1 : xmt/rcv/%loss = 10/10/0%, min/avg/max = 0.10/0.20/0.30' >&2\n\
             echo 'this goes to stdout'\n\
             echo 'fake2 : xmt/rcv/%loss = 10/0/100%' >&2\n\
             exit 1",
            args = args_file.display()
        ),
    );
    let opts = FpingOptions {
        binary: Some(script),
        period: Duration::from_millis(500),
        ..FpingOptions::default()
    };

    let (tx, mut rx) = mpsc::channel(8);
    let mut sink = ChannelSink::new(tx);
    let hosts = vec!["fake1".to_string(), "fake2".to_string()];
    let summary = monitor(&hosts, &opts, &mut sink, std::future::pending())
        .await
        .unwrap();
    drop(sink);

    assert_eq!(summary.end, StreamEnd::Exhausted);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.rejected, 1);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.host, "fake1");
    assert_eq!((first.min, first.avg, first.max), (0.10, 0.20, 0.30));
    let second = rx.recv().await.unwrap();
    assert_eq!(second.host, "fake2");
    assert_eq!(second.loss_percent, 100);
    assert!(rx.recv().await.is_none());

    let args = fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        args.trim_end(),
        "-B 1 -D -r 0 -O 0 -Q 10 -p 500 -l fake1 fake2"
    );
}

#[tokio::test]
async fn shutdown_stops_a_running_fping() {
    let _guard = SPAWN.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let script = fake_fping(
        dir.path(),
        "echo 'slow : xmt/rcv/%loss = 1/1/0%, min/avg/max = 1.0/1.0/1.0' >&2\nexec sleep 30",
    );
    let opts = FpingOptions {
        binary: Some(script),
        ..FpingOptions::default()
    };

    let (tx, mut rx) = mpsc::channel(8);
    let mut sink = ChannelSink::new(tx);
    // stop as soon as the first record has been delivered
    let shutdown = async move {
        rx.recv().await;
    };

    let started = Instant::now();
    let summary = monitor(&["slow".to_string()], &opts, &mut sink, shutdown)
        .await
        .unwrap();

    assert_eq!(summary.end, StreamEnd::Cancelled);
    assert_eq!(summary.records, 1);
    assert!(started.elapsed() < Duration::from_secs(20));
}
