use super::*;
use crate::engine::{RunState, RunSummary};
use crate::error::AbandonedUserError;
use crate::metrics::{JsonlReport, SinkCounts};
use std::time::Duration;

fn summary() -> RunSummary {
    RunSummary {
        user_count: 3,
        duration: Duration::from_secs(2),
        grace_period: Duration::from_millis(500),
        elapsed: Duration::from_millis(2_510),
        drain: Duration::from_millis(510),
        iterations: 8,
        dispatched: 6,
        skipped: 2,
        succeeded: 5,
        failed: 1,
        abandoned: vec![AbandonedUserError {
            user_id: 2,
            grace: Duration::from_millis(500),
        }],
        panicked: Vec::new(),
        state: RunState::Completed,
    }
}

fn extras() -> ReportExtras {
    ReportExtras {
        recorded: SinkCounts {
            succeeded: 5,
            failed: 1,
        },
        outcome_log: Some(OutcomeLogStats {
            report: JsonlReport {
                written: 6,
                write_failures: 0,
            },
            dropped: 0,
        }),
    }
}

#[test]
fn summary_lines_cover_totals_and_abandoned_users() -> Result<(), String> {
    let lines = summary_lines(&summary(), &extras());
    let expected = [
        "State: completed",
        "Virtual Users: 3",
        "Duration: 2.000s (elapsed 2.510s, drain 0.510s)",
        "Dispatched: 6 (75.00% of iterations)",
        "Successful: 5 (83.33%)",
        "Outcome Log: 6 written, 0 dropped, 0 write failures",
        "Abandoned Users: 1 after 0.500s grace (2)",
    ];
    for line in expected {
        if !lines.iter().any(|candidate| candidate == line) {
            return Err(format!("Missing line '{}' in {:?}", line, lines));
        }
    }
    if lines.iter().any(|line| line.starts_with("Panicked")) {
        return Err("Unexpected panicked line".to_owned());
    }
    Ok(())
}

#[test]
fn summary_lines_handle_empty_runs() -> Result<(), String> {
    let mut empty = summary();
    empty.iterations = 0;
    empty.dispatched = 0;
    empty.succeeded = 0;
    empty.abandoned.clear();
    let lines = summary_lines(&empty, &ReportExtras::default());
    if !lines
        .iter()
        .any(|line| line == "Dispatched: 0 (0.00% of iterations)")
    {
        return Err(format!("Unexpected lines {:?}", lines));
    }
    if lines.iter().any(|line| line.starts_with("Outcome Log")) {
        return Err("Outcome log line without an outcome log".to_owned());
    }
    Ok(())
}

#[test]
fn summary_json_lists_abandoned_users() -> Result<(), String> {
    let json = serde_json::to_value(SummaryJson::new(&summary(), &extras()))
        .map_err(|err| format!("encode failed: {}", err))?;
    if json.get("state") != Some(&serde_json::json!("completed")) {
        return Err(format!("Unexpected state in {}", json));
    }
    if json.get("abandoned_users") != Some(&serde_json::json!([2])) {
        return Err(format!("Unexpected abandoned users in {}", json));
    }
    if json.get("elapsed_ms") != Some(&serde_json::json!(2_510)) {
        return Err(format!("Unexpected elapsed in {}", json));
    }
    Ok(())
}
