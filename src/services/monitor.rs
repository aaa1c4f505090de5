use std::future::Future;

use tokio::io::BufReader;
use tracing::{debug, info, instrument, warn};

use crate::adapters::fping::{self, FpingOptions};
use crate::error::FpmonError;
use crate::sink::MeasurementSink;

use super::stream::{StreamEnd, StreamSummary, lines_from_reader, run};

/// Run one monitoring session: start fping for `hosts` and stream its
/// summary lines into `sink` until fping exits or `shutdown` resolves.
///
/// On shutdown the fping process is killed. Its exit status is logged but
/// not interpreted; fping exits non-zero whenever a host is unreachable.
#[instrument(skip_all, fields(hosts = hosts.len()))]
pub async fn monitor<F, S>(
    hosts: &[String],
    opts: &FpingOptions,
    sink: &mut S,
    shutdown: F,
) -> Result<StreamSummary, FpmonError>
where
    F: Future<Output = ()>,
    S: MeasurementSink + ?Sized,
{
    if hosts.is_empty() {
        return Err(FpmonError::NoHosts);
    }

    let mut process = fping::spawn(hosts, opts)?;
    info!(pid = ?process.child.id(), "fping started");

    let lines = lines_from_reader(BufReader::new(process.stderr));
    let result = run(shutdown, lines, sink).await;

    let cancelled = matches!(
        result,
        Ok(StreamSummary {
            end: StreamEnd::Cancelled,
            ..
        })
    );
    if cancelled || result.is_err() {
        if let Err(e) = process.child.kill().await {
            warn!("failed to stop fping: {}", e);
        }
    }

    match process.child.wait().await {
        Ok(status) => debug!(%status, "fping exited"),
        Err(e) => warn!("failed to reap fping: {}", e),
    }

    if let Ok(summary) = &result {
        info!(
            lines = summary.lines,
            records = summary.records,
            rejected = summary.rejected,
            sink_failures = summary.sink_failures,
            "session ended ({:?})",
            summary.end
        );
    }
    result
}
