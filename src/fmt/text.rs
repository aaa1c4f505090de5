use chrono::{DateTime, Local};
use console::style;

use crate::domain::measurement::MeasurementRecord;
use crate::stats::Stats;

fn loss_style(loss: u32) -> console::StyledObject<String> {
    let text = format!("{loss:>3}%");
    match loss {
        0 => style(text).green(),
        l if l >= 100 => style(text).red().bold(),
        _ => style(text).yellow(),
    }
}

/// Render one record as a single line.
pub fn render_record(r: &MeasurementRecord, at: &DateTime<Local>) -> String {
    let timing = if r.has_timing() {
        format!("{:.3}/{:.3}/{:.3} ms", r.min, r.avg, r.max)
    } else {
        style("-").dim().to_string()
    };
    format!(
        "{} {} {lbl_loss} {loss} {lbl_rtt} {timing}",
        style(at.format("%H:%M:%S")).dim(),
        style(&r.host).green().bold(),
        lbl_loss = style("loss:").cyan(),
        loss = loss_style(r.loss_percent),
        lbl_rtt = style("min/avg/max:").cyan(),
    )
}

/// Render the session stats of one host.
pub fn render_stats(name: &str, st: &Stats) -> String {
    let mut out = format!(
        "{} {} {} records, loss {}",
        style("Stats").bold(),
        style(name).green(),
        st.count,
        loss_style(st.loss_percent),
    );
    if st.timed > 0 {
        out.push_str(&format!(
            ", rtt min {:.3} ms, avg {:.3} ms, max {:.3} ms",
            st.rtt_min, st.rtt_avg, st.rtt_max
        ));
    } else {
        out.push_str(", no replies");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_line_without_colors() {
        console::set_colors_enabled(false);
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        let r = MeasurementRecord {
            host: "gw".into(),
            loss_percent: 0,
            min: 0.5,
            avg: 1.0,
            max: 1.5,
        };
        assert_eq!(
            render_record(&r, &at),
            "09:30:05 gw loss:   0% min/avg/max: 0.500/1.000/1.500 ms"
        );
    }

    #[test]
    fn silent_host_renders_dash() {
        console::set_colors_enabled(false);
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        let r = MeasurementRecord {
            host: "down".into(),
            loss_percent: 100,
            min: 0.0,
            avg: 0.0,
            max: 0.0,
        };
        assert!(render_record(&r, &at).ends_with("loss: 100% min/avg/max: -"));
    }

    #[test]
    fn stats_without_replies() {
        console::set_colors_enabled(false);
        let st = Stats {
            count: 4,
            loss_percent: 100,
            ..Stats::default()
        };
        assert_eq!(
            render_stats("down", &st),
            "Stats down 4 records, loss 100%, no replies"
        );
    }
}
