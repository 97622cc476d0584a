//! # Status Reports
//!
//! Renders ledger summaries as text lines for operator tooling.
//!
//! Whether the lines end up in a player's chat or on the server console is
//! the host's business: it hands us a [`ReportSink`] and we write lines.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::ledger::{OverallSummary, PlayerSummary};

/// Destination for report lines.
pub trait ReportSink {
    /// Emits one line.
    fn send_line(&mut self, line: &str);
}

/// Collects lines in memory (chat buffers, tests).
impl ReportSink for Vec<String> {
    fn send_line(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Writes lines to the server console through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn send_line(&mut self, line: &str) {
        tracing::info!(target: "warden::report", "{}", line);
    }
}

/// Formats a wall-clock time as a UTC date and time, to the second.
#[must_use]
pub fn format_wall_clock(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Writes one player's violations, or a "none recorded" line.
pub fn write_player_summary<S: ReportSink + ?Sized>(
    sink: &mut S,
    label: &str,
    summary: Option<&PlayerSummary>,
) {
    let Some(summary) = summary.filter(|s| s.violation_count > 0) else {
        sink.send_line(&format!("No violations recorded for {label}"));
        return;
    };

    sink.send_line(&format!("WARDEN violations for {label}:"));
    sink.send_line(&format!("Total violations: {}", summary.violation_count));
    if let Some(wall) = summary.last_violation_wall {
        sink.send_line(&format!("Last violation: {}", format_wall_clock(wall)));
    }
    if summary.banned {
        sink.send_line("Status: banned");
    }
    for entry in &summary.history {
        sink.send_line(&format!(
            "{}: [{}] {}",
            format_wall_clock(entry.wall_clock),
            entry.kind,
            entry.description
        ));
    }
}

/// Writes totals across all monitored players.
pub fn write_overall_summary<S: ReportSink + ?Sized>(sink: &mut S, summary: &OverallSummary) {
    sink.send_line("WARDEN statistics:");
    sink.send_line(&format!("Total players monitored: {}", summary.monitored_players));
    sink.send_line(&format!("Total violations detected: {}", summary.total_violations));
}
