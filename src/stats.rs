use std::collections::BTreeMap;

use crate::domain::measurement::MeasurementRecord;
#[cfg(feature = "json")]
use serde::Serialize;

/// Summary of all records seen for one host.
///
/// Round-trip figures only consider records with a non-zero round-trip time;
/// they stay at 0.0 for a host that never answered.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct Stats {
    pub count: usize,
    pub timed: usize,
    pub loss_percent: u32,
    pub rtt_min: f64,
    pub rtt_avg: f64,
    pub rtt_max: f64,
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    count: usize,
    timed: usize,
    last_loss: u32,
    min: f64,
    max: f64,
    avg_sum: f64,
}

impl Accumulator {
    fn push(&mut self, r: &MeasurementRecord) {
        self.count += 1;
        // loss is cumulative in fping, so the latest value is the session value
        self.last_loss = r.loss_percent;
        if !r.has_timing() {
            return;
        }
        if self.timed == 0 {
            self.min = r.min;
            self.max = r.max;
        } else {
            self.min = self.min.min(r.min);
            self.max = self.max.max(r.max);
        }
        self.avg_sum += r.avg;
        self.timed += 1;
    }

    fn stats(&self) -> Stats {
        Stats {
            count: self.count,
            timed: self.timed,
            loss_percent: self.last_loss,
            rtt_min: self.min,
            rtt_avg: if self.timed > 0 {
                self.avg_sum / self.timed as f64
            } else {
                0.0
            },
            rtt_max: self.max,
        }
    }
}

/// Running per-host statistics for a whole session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    hosts: BTreeMap<String, Accumulator>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, r: &MeasurementRecord) {
        self.hosts.entry(r.host.clone()).or_default().push(r);
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Per-host stats sorted by host name.
    pub fn summaries(&self) -> Vec<(String, Stats)> {
        self.hosts
            .iter()
            .map(|(host, acc)| (host.clone(), acc.stats()))
            .collect()
    }
}
