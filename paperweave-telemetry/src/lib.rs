use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry lock poisoned")]
    Poisoned,
}

/// One row per pipeline run. Fixed schema: the column set is the union of
/// what every engine reports, so rows from all engines share one header.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TelemetryRow {
    pub run_id: String,
    pub engine: String,
    pub input_chars: usize,
    pub summary_len: usize,
    pub meta_len: usize,
    pub latency_s: f64,
    pub reader_s: f64,
    pub results_extractor_s: f64,
    pub summarizer_s: f64,
    pub critic_s: f64,
    pub integrator_s: f64,
    pub critic_score: f64,
    pub critic_loops: u32,
    pub quality_f1: f64,
    pub judge_score: f64,
    pub judge_aggregate: f64,
    pub quant_signal: String,
    pub extracted_metrics_count: usize,
    pub confidence: String,
}

/// Fire-and-forget run log. Implementations must tolerate repeated calls and
/// concurrent runs; a failing sink must never fail the run that used it.
pub trait TelemetrySink: Send + Sync {
    fn log_row(&self, row: &TelemetryRow) -> Result<(), TelemetryError>;
}

/// Discards every row. Default sink for tests and library embedding.
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn log_row(&self, _row: &TelemetryRow) -> Result<(), TelemetryError> {
        Ok(())
    }
}

const HEADER: &str = "ts,run_id,engine,input_chars,summary_len,meta_len,latency_s,reader_s,\
results_extractor_s,summarizer_s,critic_s,integrator_s,critic_score,critic_loops,\
quality_f1,judge_score,judge_aggregate,quant_signal,extracted_metrics_count,confidence";

/// Append-only CSV log. A process-wide mutex plus append-mode opens give the
/// single-writer-at-a-time discipline the sink contract requires.
pub struct CsvTelemetry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvTelemetry {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render(row: &TelemetryRow) -> String {
    let ts = chrono::Utc::now().to_rfc3339();
    [
        ts,
        escape(&row.run_id),
        escape(&row.engine),
        row.input_chars.to_string(),
        row.summary_len.to_string(),
        row.meta_len.to_string(),
        row.latency_s.to_string(),
        row.reader_s.to_string(),
        row.results_extractor_s.to_string(),
        row.summarizer_s.to_string(),
        row.critic_s.to_string(),
        row.integrator_s.to_string(),
        row.critic_score.to_string(),
        row.critic_loops.to_string(),
        row.quality_f1.to_string(),
        row.judge_score.to_string(),
        row.judge_aggregate.to_string(),
        escape(&row.quant_signal),
        row.extracted_metrics_count.to_string(),
        escape(&row.confidence),
    ]
    .join(",")
}

impl TelemetrySink for CsvTelemetry {
    fn log_row(&self, row: &TelemetryRow) -> Result<(), TelemetryError> {
        let _guard = self.lock.lock().map_err(|_| TelemetryError::Poisoned)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if write_header {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(file, "{}", render(row))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sample_row(engine: &str) -> TelemetryRow {
        TelemetryRow {
            run_id: "r-1".to_string(),
            engine: engine.to_string(),
            input_chars: 1200,
            summary_len: 240,
            meta_len: 400,
            latency_s: 3.21,
            reader_s: 1.1,
            critic_score: 0.8,
            critic_loops: 1,
            quant_signal: "YES".to_string(),
            confidence: "Confidence: High - grounded, with numbers".to_string(),
            ..TelemetryRow::default()
        }
    }

    #[test]
    fn writes_header_once_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvTelemetry::new(dir.path().join("runs.csv"));
        sink.log_row(&sample_row("graph")).unwrap();
        sink.log_row(&sample_row("sequential")).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ts,run_id,engine,"));
        assert!(lines[1].contains(",graph,"));
        assert!(lines[2].contains(",sequential,"));
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvTelemetry::new(dir.path().join("runs.csv"));
        sink.log_row(&sample_row("graph")).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("\"Confidence: High - grounded, with numbers\""));
    }

    #[test]
    fn concurrent_writers_never_interleave_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(CsvTelemetry::new(dir.path().join("runs.csv")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        sink.log_row(&sample_row(&format!("engine-{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1 + 8 * 25);
        for line in &lines[1..] {
            assert_eq!(line.matches(",engine-").count(), 1);
        }
    }
}
