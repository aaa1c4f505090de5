use chrono::{DateTime, Utc};
#[cfg(feature = "json")]
use serde::Serialize;

use crate::domain::measurement::MeasurementRecord;
use crate::error::FpmonError;
use crate::stats::Stats;

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonRecord<'a> {
    pub ts: String,
    pub host: &'a str,
    pub loss_percent: u32,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
}

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonHostStats<'a> {
    pub host: &'a str,
    #[serde(flatten)]
    pub stats: &'a Stats,
}

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonSummary<'a> {
    pub schema_version: u8,
    pub run_ts: String,
    pub hosts: Vec<JsonHostStats<'a>>,
}

/// Serialize one record as a compact JSON line stamped with `ts`.
#[allow(unused_variables)]
pub fn record_to_json(r: &MeasurementRecord, ts: &DateTime<Utc>) -> Result<String, FpmonError> {
    #[cfg(feature = "json")]
    {
        let rec = JsonRecord {
            ts: ts.to_rfc3339(),
            host: &r.host,
            loss_percent: r.loss_percent,
            min_ms: r.min,
            avg_ms: r.avg,
            max_ms: r.max,
        };
        serde_json::to_string(&rec).map_err(|e| FpmonError::Other(e.to_string()))
    }
    #[cfg(not(feature = "json"))]
    {
        Err(FpmonError::Other("json feature disabled".into()))
    }
}

/// Serialize the end-of-session stats.
#[allow(unused_variables)]
pub fn stats_list_to_json(list: &[(String, Stats)], pretty: bool) -> Result<String, FpmonError> {
    #[cfg(feature = "json")]
    {
        let summary = JsonSummary {
            schema_version: 1,
            run_ts: Utc::now().to_rfc3339(),
            hosts: list
                .iter()
                .map(|(host, stats)| JsonHostStats { host, stats })
                .collect(),
        };
        let text = if pretty {
            serde_json::to_string_pretty(&summary).map_err(|e| FpmonError::Other(e.to_string()))?
        } else {
            serde_json::to_string(&summary).map_err(|e| FpmonError::Other(e.to_string()))?
        };
        Ok(text)
    }
    #[cfg(not(feature = "json"))]
    {
        Err(FpmonError::Other("json feature disabled".into()))
    }
}
