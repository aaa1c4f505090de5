use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStderr, Command};
use tracing::debug;

use crate::error::FpmonError;

const FPING: &str = "fping";

/// Knobs passed to fping in loop mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FpingOptions {
    /// Explicit executable; `None` searches `PATH`.
    pub binary: Option<PathBuf>,
    /// Retry backoff factor (`-B`).
    pub backoff: f64,
    /// Retries per probe (`-r`).
    pub retries: u32,
    /// Type of service byte (`-O`).
    pub tos: u8,
    /// Interval between probes to one host (`-p`).
    pub period: Duration,
    /// Interval between summary lines on stderr (`-Q`).
    pub summary_interval: Duration,
}

impl Default for FpingOptions {
    fn default() -> Self {
        Self {
            binary: None,
            backoff: 1.0,
            retries: 0,
            tos: 0,
            period: Duration::from_millis(1000),
            summary_interval: Duration::from_secs(10),
        }
    }
}

impl FpingOptions {
    /// Full argument list for the given hosts.
    pub fn args(&self, hosts: &[String]) -> Vec<String> {
        let mut args = vec![
            "-B".to_string(),
            self.backoff.to_string(),
            "-D".to_string(),
            "-r".to_string(),
            self.retries.to_string(),
            "-O".to_string(),
            self.tos.to_string(),
            "-Q".to_string(),
            self.summary_interval.as_secs().max(1).to_string(),
            "-p".to_string(),
            self.period.as_millis().to_string(),
            "-l".to_string(),
        ];
        args.extend(hosts.iter().cloned());
        args
    }
}

/// A running fping whose stderr carries the summary lines.
pub struct FpingProcess {
    pub child: Child,
    pub stderr: ChildStderr,
}

/// Resolve the fping executable: the configured path if any, else `PATH`.
pub fn locate(binary: Option<&Path>) -> Result<PathBuf, FpmonError> {
    if let Some(path) = binary {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(FpmonError::FpingNotFound(format!(
                "'{}' does not exist",
                path.display()
            )))
        };
    }
    let path_var = env::var_os("PATH").unwrap_or_default();
    search_path(&path_var).ok_or_else(|| FpmonError::FpingNotFound("not in PATH".into()))
}

fn search_path(path_var: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_var)
        .map(|dir| dir.join(FPING))
        .find(|candidate| candidate.is_file())
}

/// Start fping for `hosts` with stdout discarded and stderr piped.
///
/// The child is killed if the returned handle is dropped.
pub fn spawn(hosts: &[String], opts: &FpingOptions) -> Result<FpingProcess, FpmonError> {
    let path = locate(opts.binary.as_deref())?;
    let args = opts.args(hosts);
    debug!(path = %path.display(), ?args, "spawning fping");

    let mut child = Command::new(&path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| FpmonError::Spawn {
            path: path.clone(),
            source,
        })?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| FpmonError::Other("failed to capture fping stderr".into()))?;

    Ok(FpingProcess { child, stderr })
}
