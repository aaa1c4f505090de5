use std::io::Write;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

use crate::domain::measurement::MeasurementRecord;
use crate::fmt;
use crate::sink::{MeasurementSink, SinkError};
use crate::stats::SessionStats;

/// Line format used by [`ConsoleSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Text,
    Json,
}

/// Sink that prints each record as one line and keeps session stats.
///
/// Records are stamped with the time they are written, which trails the
/// fping summary line by the parse/forward latency only.
pub struct ConsoleSink<W> {
    out: W,
    format: RecordFormat,
    stats: SessionStats,
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, format: RecordFormat) -> Self {
        Self {
            out,
            format,
            stats: SessionStats::new(),
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_inner(self) -> (W, SessionStats) {
        (self.out, self.stats)
    }

    fn render(&self, r: &MeasurementRecord, ts: DateTime<Utc>) -> Result<String, SinkError> {
        match self.format {
            RecordFormat::Text => {
                let local: DateTime<Local> = DateTime::from(ts);
                Ok(fmt::text::render_record(r, &local))
            }
            RecordFormat::Json => {
                fmt::json::record_to_json(r, &ts).map_err(|e| SinkError::Encode(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl<W: Write + Send> MeasurementSink for ConsoleSink<W> {
    async fn write(&mut self, record: MeasurementRecord) -> Result<(), SinkError> {
        self.stats.record(&record);
        let line = self.render(&record, Utc::now())?;
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}
