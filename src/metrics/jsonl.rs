use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::engine::{MetricsSink, Outcome};
use crate::error::{AppError, SinkError};

const LOG_BUFFER_SIZE: usize = 64 * 1024;

/// One line of the outcome log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub timestamp: String,
    pub user_id: usize,
    pub iteration: u64,
    pub latency_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OutcomeRecord {
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let error = outcome.error();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            user_id: outcome.context.user_id,
            iteration: outcome.context.iteration,
            latency_ms: u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX),
            success: outcome.is_success(),
            status: outcome.status(),
            error: error.map(crate::error::DispatchError::kind),
            message: error.map(ToString::to_string),
        }
    }
}

/// Hands outcomes to a background writer without blocking the caller. When
/// the channel is full the record is dropped and counted.
pub struct JsonlSink {
    sender: mpsc::Sender<OutcomeRecord>,
    dropped: AtomicU64,
}

impl JsonlSink {
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MetricsSink for JsonlSink {
    fn record(&self, outcome: &Outcome) {
        match self.sender.try_send(OutcomeRecord::from_outcome(outcome)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_) | mpsc::error::TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonlReport {
    pub written: u64,
    pub write_failures: u64,
}

/// Owns the writer task behind a [`JsonlSink`].
pub struct JsonlWriter {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<JsonlReport>,
}

impl JsonlWriter {
    /// Writes whatever is still queued, flushes the file and stops the task.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer task panicked.
    pub async fn finish(self) -> Result<JsonlReport, AppError> {
        if self.stop_tx.send(()).is_err() {
            debug!("Outcome writer already stopped");
        }
        Ok(self.handle.await?)
    }
}

/// Creates the outcome log file and starts its writer task.
///
/// # Errors
///
/// Returns [`SinkError::OpenOutput`] when the file cannot be created.
pub async fn open_jsonl_sink(
    path: &Path,
    capacity: usize,
) -> Result<(Arc<JsonlSink>, JsonlWriter), SinkError> {
    let file = File::create(path)
        .await
        .map_err(|err| SinkError::OpenOutput {
            path: path.to_path_buf(),
            source: err,
        })?;
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let (stop_tx, stop_rx) = oneshot::channel();
    let handle = tokio::spawn(write_records(file, receiver, stop_rx));
    debug!("Writing outcome log to {}", path.display());

    Ok((
        Arc::new(JsonlSink {
            sender,
            dropped: AtomicU64::new(0),
        }),
        JsonlWriter { stop_tx, handle },
    ))
}

async fn write_records(
    file: File,
    mut receiver: mpsc::Receiver<OutcomeRecord>,
    mut stop_rx: oneshot::Receiver<()>,
) -> JsonlReport {
    let mut writer = BufWriter::with_capacity(LOG_BUFFER_SIZE, file);
    let mut report = JsonlReport::default();

    loop {
        tokio::select! {
            biased;
            record = receiver.recv() => {
                let Some(record) = record else {
                    break;
                };
                write_record(&mut writer, &record, &mut report).await;
            }
            _ = &mut stop_rx => {
                while let Ok(record) = receiver.try_recv() {
                    write_record(&mut writer, &record, &mut report).await;
                }
                break;
            }
        }
    }

    if let Err(err) = writer.flush().await {
        report.write_failures = report.write_failures.saturating_add(1);
        warn!("{}", SinkError::Write { source: err });
    }
    report
}

async fn write_record(
    writer: &mut BufWriter<File>,
    record: &OutcomeRecord,
    report: &mut JsonlReport,
) {
    let result = match serde_json::to_vec(record) {
        Ok(mut line) => {
            line.push(b'\n');
            writer
                .write_all(&line)
                .await
                .map_err(|err| SinkError::Write { source: err })
        }
        Err(err) => Err(SinkError::Encode { source: err }),
    };
    match result {
        Ok(()) => report.written = report.written.saturating_add(1),
        Err(err) => {
            if report.write_failures == 0 {
                warn!("{}", err);
            }
            report.write_failures = report.write_failures.saturating_add(1);
        }
    }
}
