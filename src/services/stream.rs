use std::future::Future;
use std::io;

use futures::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace, warn};

use crate::error::FpmonError;
use crate::parser::line::parse_line;
use crate::sink::MeasurementSink;

/// Why the read loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The line source was closed.
    Exhausted,
    /// The shutdown future resolved first.
    Cancelled,
}

/// Counters for one pass over a line source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub lines: u64,
    pub records: u64,
    pub rejected: u64,
    pub sink_failures: u64,
    pub end: StreamEnd,
}

/// Adapt a buffered reader into a line stream.
///
/// Lines are split on `\n` with a trailing `\r` dropped. Bytes that are not
/// valid UTF-8 are replaced rather than failing the read, so such a line
/// reaches the parser like any other. The stream ends at EOF and
/// yields a read error at most once.
pub fn lines_from_reader<R>(reader: R) -> impl Stream<Item = io::Result<String>> + Unpin
where
    R: AsyncBufRead + Unpin,
{
    Box::pin(stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(decode_line(&buf)), Some(reader))),
            Err(e) => Some((Err(e), None)),
        }
    }))
}

fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Drain `lines`, parse each one and hand every record to `sink` in order.
///
/// Lines that are not data lines are skipped. A failed sink write is logged
/// and counted and the loop moves on. A read error ends the loop and is
/// returned. EOF and `shutdown` both end the loop with `Ok`.
///
/// `shutdown` is also watched while a write is pending, so a sink that
/// blocks cannot hold the loop open; the record being written is dropped.
pub async fn run<F, L, S>(
    shutdown: F,
    mut lines: L,
    sink: &mut S,
) -> Result<StreamSummary, FpmonError>
where
    F: Future<Output = ()>,
    L: Stream<Item = io::Result<String>> + Unpin,
    S: MeasurementSink + ?Sized,
{
    tokio::pin!(shutdown);

    let mut summary = StreamSummary {
        lines: 0,
        records: 0,
        rejected: 0,
        sink_failures: 0,
        end: StreamEnd::Exhausted,
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!("shutdown requested, leaving read loop");
                summary.end = StreamEnd::Cancelled;
                break;
            }
            next = lines.next() => next,
        };

        let Some(line) = next else {
            debug!("line source closed");
            break;
        };
        let line = line?;
        summary.lines += 1;

        let record = match parse_line(&line) {
            Ok(record) => record,
            Err(reason) => {
                trace!(%reason, line = %line, "skipping line");
                summary.rejected += 1;
                continue;
            }
        };

        let host = record.host.clone();
        let written = tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!(host = %host, "shutdown requested during sink write");
                summary.end = StreamEnd::Cancelled;
                break;
            }
            written = sink.write(record) => written,
        };
        match written {
            Ok(()) => summary.records += 1,
            Err(e) => {
                warn!(host = %host, "Error writing measurement: {}", e);
                summary.sink_failures += 1;
            }
        }
    }

    Ok(summary)
}
