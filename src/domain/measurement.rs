#[cfg(feature = "json")]
use serde::Serialize;

/// One reachability/latency observation for one host, as reported by a
/// single fping summary line.
///
/// `loss_percent` is cumulative since fping started. The timing fields are
/// milliseconds for the most recent probe batch and are all `0.0` when the
/// line carried no timing segment. Ordering `min <= avg <= max` is whatever
/// fping reported; it is not checked.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct MeasurementRecord {
    pub host: String,
    pub loss_percent: u32,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl MeasurementRecord {
    /// Whether any round-trip time is non-zero.
    ///
    /// An untimed line and a reply fping rounded to `0.00/0.00/0.00` (loopback
    /// under 10 µs) produce the same record, so both count as untimed here:
    /// they render as `-` and stay out of the RTT statistics.
    pub fn has_timing(&self) -> bool {
        self.min != 0.0 || self.avg != 0.0 || self.max != 0.0
    }
}
