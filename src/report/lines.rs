use std::time::Duration;

use crate::engine::RunSummary;

use super::ReportExtras;

/// Scale for two-decimal percentages.
const PERCENT_X100: u64 = 10_000;
const PERCENT_DIVISOR: u64 = 100;

#[must_use]
pub fn summary_lines(summary: &RunSummary, extras: &ReportExtras) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("State: {}", summary.state));
    lines.push(format!("Virtual Users: {}", summary.user_count));
    lines.push(format!(
        "Duration: {} (elapsed {}, drain {})",
        format_duration(summary.duration),
        format_duration(summary.elapsed),
        format_duration(summary.drain)
    ));
    lines.push(format!("Iterations: {}", summary.iterations));
    let send_rate = ratio_x100(summary.dispatched, summary.iterations);
    lines.push(format!(
        "Dispatched: {} ({}.{:02}% of iterations)",
        summary.dispatched,
        send_rate / PERCENT_DIVISOR,
        send_rate % PERCENT_DIVISOR
    ));
    lines.push(format!("Skipped: {}", summary.skipped));
    let success_rate = ratio_x100(summary.succeeded, summary.dispatched);
    lines.push(format!(
        "Successful: {} ({}.{:02}%)",
        summary.succeeded,
        success_rate / PERCENT_DIVISOR,
        success_rate % PERCENT_DIVISOR
    ));
    lines.push(format!("Failed: {}", summary.failed));
    lines.push(format!(
        "Recorded: {} ok / {} failed",
        extras.recorded.succeeded, extras.recorded.failed
    ));

    if let Some(log) = extras.outcome_log {
        lines.push(format!(
            "Outcome Log: {} written, {} dropped, {} write failures",
            log.report.written, log.dropped, log.report.write_failures
        ));
    }

    if !summary.abandoned.is_empty() {
        let ids: Vec<String> = summary
            .abandoned
            .iter()
            .map(|err| err.user_id.to_string())
            .collect();
        lines.push(format!(
            "Abandoned Users: {} after {} grace ({})",
            summary.abandoned.len(),
            format_duration(summary.grace_period),
            ids.join(", ")
        ));
    }
    if !summary.panicked.is_empty() {
        let ids: Vec<String> = summary.panicked.iter().map(ToString::to_string).collect();
        lines.push(format!(
            "Panicked Users: {} ({})",
            summary.panicked.len(),
            ids.join(", ")
        ));
    }

    lines
}

fn ratio_x100(part: u64, whole: u64) -> u64 {
    part.saturating_mul(PERCENT_X100)
        .checked_div(whole)
        .unwrap_or(0)
}

/// `1.250s` style, millisecond precision.
fn format_duration(duration: Duration) -> String {
    format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
}
