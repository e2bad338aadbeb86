use super::*;
use crate::engine::{DispatchContext, MetricsSink, Outcome};
use crate::error::DispatchError;
use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn success(user_id: usize, iteration: u64) -> Outcome {
    Outcome::new(
        DispatchContext { user_id, iteration },
        Duration::from_millis(12),
        Ok(200),
    )
}

fn failure(user_id: usize, iteration: u64) -> Outcome {
    Outcome::new(
        DispatchContext { user_id, iteration },
        Duration::from_millis(40),
        Err(DispatchError::UnexpectedStatus {
            status: 500,
            expected: 200,
        }),
    )
}

#[test]
fn counting_sink_tallies_outcomes() -> Result<(), String> {
    let sink = CountingSink::default();
    sink.record(&success(0, 0));
    sink.record(&success(1, 0));
    sink.record(&failure(2, 0));

    let counts = sink.counts();
    if counts
        != (SinkCounts {
            succeeded: 2,
            failed: 1,
        })
    {
        return Err(format!("Unexpected counts {:?}", counts));
    }
    if counts.total() != 3 {
        return Err("Unexpected total".to_owned());
    }
    Ok(())
}

#[test]
fn fanout_sink_forwards_to_every_sink() -> Result<(), String> {
    let first = Arc::new(CountingSink::default());
    let second = Arc::new(CountingSink::default());
    let fanout = FanoutSink::default()
        .with(first.clone())
        .with(second.clone())
        .with(Arc::new(TracingSink));

    fanout.record(&success(0, 1));
    fanout.record(&failure(0, 2));

    for sink in [&first, &second] {
        if sink.counts().total() != 2 {
            return Err(format!("Sink missed records: {:?}", sink.counts()));
        }
    }
    Ok(())
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut bytes) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

fn tracing_sink_output(level: tracing::Level, outcome: &Outcome) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || TracingSink.record(outcome));
    logs.text()
}

#[test]
fn tracing_sink_keeps_failures_out_of_warn_output() -> Result<(), String> {
    let at_warn = tracing_sink_output(tracing::Level::WARN, &failure(3, 1));
    if !at_warn.is_empty() {
        return Err(format!("Failure logged at warn: {}", at_warn));
    }
    let at_debug = tracing_sink_output(tracing::Level::DEBUG, &failure(3, 1));
    if !at_debug.contains("Request failed") || !at_debug.contains("unexpected_status") {
        return Err(format!("Failure missing at debug: {}", at_debug));
    }
    let success_at_debug = tracing_sink_output(tracing::Level::DEBUG, &success(3, 2));
    if !success_at_debug.is_empty() {
        return Err(format!("Success logged above trace: {}", success_at_debug));
    }
    Ok(())
}

#[test]
fn outcome_record_describes_failures() -> Result<(), String> {
    let record = OutcomeRecord::from_outcome(&failure(4, 9));
    if record.user_id != 4 || record.iteration != 9 || record.latency_ms != 40 {
        return Err(format!("Unexpected record {:?}", record));
    }
    if record.success || record.status != Some(500) {
        return Err(format!("Unexpected status fields {:?}", record));
    }
    if record.error != Some("unexpected_status") || record.message.is_none() {
        return Err(format!("Unexpected error fields {:?}", record));
    }

    let ok = OutcomeRecord::from_outcome(&success(1, 1));
    let json = serde_json::to_value(&ok).map_err(|err| format!("encode failed: {}", err))?;
    if json.get("error").is_some() || json.get("status") != Some(&serde_json::json!(200)) {
        return Err(format!("Unexpected success json {}", json));
    }
    Ok(())
}

#[test]
fn jsonl_sink_writes_one_line_per_outcome() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("outcomes.jsonl");
        let (sink, writer) = open_jsonl_sink(&path, 64)
            .await
            .map_err(|err| format!("open failed: {}", err))?;

        sink.record(&success(0, 0));
        sink.record(&failure(1, 0));
        sink.record(&success(2, 5));

        let report = writer
            .finish()
            .await
            .map_err(|err| format!("finish failed: {}", err))?;
        if report.written != 3 || report.write_failures != 0 || sink.dropped() != 0 {
            return Err(format!("Unexpected report {:?}", report));
        }

        let content = std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()
            .map_err(|err| format!("invalid json line: {}", err))?;
        if lines.len() != 3 {
            return Err(format!("Expected 3 lines, got {}", lines.len()));
        }
        let users: Vec<_> = lines.iter().filter_map(|line| line.get("user_id")).collect();
        if users != [&serde_json::json!(0), &serde_json::json!(1), &serde_json::json!(2)] {
            return Err(format!("Unexpected user order {:?}", users));
        }
        if lines
            .iter()
            .any(|line| line.get("timestamp").and_then(serde_json::Value::as_str).is_none())
        {
            return Err("Every line needs a timestamp".to_owned());
        }
        Ok(())
    })
}

#[test]
fn jsonl_sink_counts_drops_when_full() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("outcomes.jsonl");
        let (sink, writer) = open_jsonl_sink(&path, 2)
            .await
            .map_err(|err| format!("open failed: {}", err))?;

        for iteration in 0..5 {
            sink.record(&success(0, iteration));
        }

        let report = writer
            .finish()
            .await
            .map_err(|err| format!("finish failed: {}", err))?;
        if report.written != 2 || sink.dropped() != 3 {
            return Err(format!(
                "Expected 2 written and 3 dropped, got {:?} / {}",
                report,
                sink.dropped()
            ));
        }
        Ok(())
    })
}

#[test]
fn jsonl_sink_fails_on_missing_directory() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("missing").join("outcomes.jsonl");
        match open_jsonl_sink(&path, 8).await {
            Err(crate::error::SinkError::OpenOutput { .. }) => Ok(()),
            Err(err) => Err(format!("Expected OpenOutput, got {}", err)),
            Ok(_) => Err("Expected open to fail".to_owned()),
        }
    })
}
