use std::fmt;

use crate::domain::measurement::MeasurementRecord;

/// Token holding the `xmt/rcv/%loss` descriptor.
const LOSS_FIELD: usize = 4;
/// Token holding the `min/avg/max` descriptor, when present.
const TIMING_FIELD: usize = 7;
/// Lines with more tokens than this carry a timing segment.
const TIMING_THRESHOLD: usize = 5;

/// Reason a line was not turned into a [`MeasurementRecord`].
///
/// Every variant means "not a data line"; the reason only feeds debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    TooFewTokens,
    MissingLossField,
    MalformedLoss,
    MissingTimingField,
    MalformedTiming,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejected::TooFewTokens => "fewer than 2 tokens",
            Rejected::MissingLossField => "no loss descriptor",
            Rejected::MalformedLoss => "loss descriptor has fewer than 3 fields",
            Rejected::MissingTimingField => "no timing descriptor",
            Rejected::MalformedTiming => "timing descriptor has fewer than 3 fields",
        };
        f.write_str(reason)
    }
}

/// Parse one fping summary line.
///
/// Supported shapes (tokens separated by any run of whitespace):
/// - `host : xmt/rcv/%loss = 10/10/0%, min/avg/max = 0.91/1.20/2.03`
/// - `host : xmt/rcv/%loss = 10/0/100%`
///
/// Rules:
/// - fewer than 2 tokens (blank lines, `[12:00:00]` headers) is rejected.
/// - token 0 is the host, kept verbatim.
/// - token 4 is the loss descriptor; its third `/` field loses trailing
///   `%`/`,` and is parsed as an integer, falling back to 0.
/// - with more than 5 tokens, token 7 is the timing descriptor; each of its
///   three `/` fields is parsed on its own, falling back to 0.0 when it is
///   not a finite, non-negative number.
/// - a positional field that is absent rejects the line instead of panicking.
pub fn parse_line(line: &str) -> Result<MeasurementRecord, Rejected> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(Rejected::TooFewTokens);
    }

    let host = fields[0];

    let loss = fields.get(LOSS_FIELD).ok_or(Rejected::MissingLossField)?;
    let loss = slash_fields(loss);
    let Some(loss_raw) = loss.get(2) else {
        return Err(Rejected::MalformedLoss);
    };
    let loss_percent = parse_or_zero(loss_raw.trim_end_matches(['%', ',']));

    let (min, avg, max) = if fields.len() > TIMING_THRESHOLD {
        let timing = fields.get(TIMING_FIELD).ok_or(Rejected::MissingTimingField)?;
        match slash_fields(timing)[..] {
            [min, avg, max, ..] => (ms_or_zero(min), ms_or_zero(avg), ms_or_zero(max)),
            _ => return Err(Rejected::MalformedTiming),
        }
    } else {
        (0.0, 0.0, 0.0)
    };

    Ok(MeasurementRecord {
        host: host.to_string(),
        loss_percent,
        min,
        avg,
        max,
    })
}

/// Split on `/`, dropping empty pieces.
fn slash_fields(s: &str) -> Vec<&str> {
    s.split('/').filter(|part| !part.is_empty()).collect()
}

fn parse_or_zero(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

/// Round-trip time in ms; anything that is not a finite, non-negative number
/// reads as 0.0.
fn ms_or_zero(s: &str) -> f64 {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}
