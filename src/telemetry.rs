use std::collections::{BTreeMap, BTreeSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::config::RuntimeConfig;

pub fn unix_ms_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
struct TelemetryRecord<'a> {
    ts_unix_ms: u64,
    event: &'a str,
    run_id: &'a str,
    command: &'a str,
    #[serde(flatten)]
    payload: &'a Value,
}

/// Append-only JSONL event sink. Every run gets a fresh run id; events carry
/// the command label so multi-command sessions stay distinguishable in the
/// report.
#[derive(Debug, Clone)]
pub struct TelemetrySink {
    enabled: bool,
    path: PathBuf,
    run_id: String,
    command: String,
    write_lock: Arc<Mutex<()>>,
}

impl TelemetrySink {
    pub fn new(cfg: &RuntimeConfig, command: String) -> Self {
        Self {
            enabled: cfg.telemetry_enabled,
            path: PathBuf::from(&cfg.telemetry_path),
            run_id: format!("run-{}-{}", unix_ms_now(), std::process::id()),
            command,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Best-effort: a failed write degrades to a warning, never an error.
    pub fn emit(&self, event: &str, payload: Value) {
        if !self.enabled {
            return;
        }

        let record = TelemetryRecord {
            ts_unix_ms: unix_ms_now() as u64,
            event,
            run_id: &self.run_id,
            command: &self.command,
            payload: &payload,
        };

        if let Err(err) = self.append(&record) {
            tracing::warn!(
                event = event,
                path = %self.path.display(),
                error = %err,
                "telemetry write failed"
            );
        }
    }

    fn append(&self, record: &TelemetryRecord<'_>) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let line = serde_json::to_string(record).context("failed to serialize telemetry event")?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open telemetry path '{}'", self.path.display()))?;
        writeln!(file, "{line}").context("failed to append telemetry line")
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create telemetry directory '{}'",
            parent.display()
        )
    })
}

#[derive(Debug, Default)]
pub struct TelemetrySummary {
    pub total_lines: usize,
    pub parsed_events: usize,
    pub parse_errors: usize,
    pub unique_runs: BTreeSet<String>,
    pub command_counts: BTreeMap<String, usize>,
    pub command_completed: usize,
    pub command_failed: usize,
    pub leads_collected: usize,
    pub members_responded: usize,
    pub tool_requested: usize,
    pub tool_succeeded: usize,
    pub tool_failed: usize,
    pub last_event_ts_unix_ms: Option<u128>,
}

impl TelemetrySummary {
    fn ingest(&mut self, parsed: &Value) {
        let text_field = |key: &str| {
            parsed
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let run_id = text_field("run_id");
        if !run_id.is_empty() {
            self.unique_runs.insert(run_id);
        }

        let command = text_field("command");
        if !command.is_empty() {
            *self.command_counts.entry(command).or_insert(0) += 1;
        }

        if let Some(ts) = parsed.get("ts_unix_ms").and_then(Value::as_u64) {
            let ts = ts as u128;
            self.last_event_ts_unix_ms =
                Some(self.last_event_ts_unix_ms.map_or(ts, |prev| prev.max(ts)));
        }

        match text_field("event").as_str() {
            "command.completed" => self.command_completed += 1,
            "command.failed" => self.command_failed += 1,
            "leads.collected" => {
                self.leads_collected += parsed
                    .get("count")
                    .and_then(Value::as_u64)
                    .unwrap_or_default() as usize;
            }
            "member.responded" => self.members_responded += 1,
            "tool.requested" => self.tool_requested += 1,
            "tool.succeeded" => self.tool_succeeded += 1,
            "tool.failed" => self.tool_failed += 1,
            _ => {}
        }
    }
}

/// Summarizes the newest `limit` events of the stream.
pub fn summarize_telemetry_lines(lines: Vec<String>, limit: usize) -> TelemetrySummary {
    let mut summary = TelemetrySummary {
        total_lines: lines.len(),
        ..TelemetrySummary::default()
    };

    for line in lines.iter().rev().take(limit.max(1)) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(parsed) => {
                summary.parsed_events += 1;
                summary.ingest(&parsed);
            }
            Err(_) => summary.parse_errors += 1,
        }
    }

    summary
}

pub fn run_telemetry_report(
    cfg: &RuntimeConfig,
    path_override: Option<String>,
    limit: usize,
) -> Result<()> {
    let path = PathBuf::from(path_override.unwrap_or_else(|| cfg.telemetry_path.clone()));
    if !path.exists() {
        println!("No telemetry recorded yet at '{}'.", path.display());
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read telemetry file '{}'", path.display()))?;
    let lines = content.lines().map(str::to_string).collect::<Vec<String>>();
    let summary = summarize_telemetry_lines(lines, limit);

    println!("Telemetry report for '{}'", path.display());
    println!(
        "- events: {} analyzed from {} lines ({} parse errors)",
        summary.parsed_events, summary.total_lines, summary.parse_errors
    );
    println!("- runs: {}", summary.unique_runs.len());
    println!(
        "- commands: completed={} failed={}",
        summary.command_completed, summary.command_failed
    );
    println!(
        "- enrichment: leads_collected={} member_responses={}",
        summary.leads_collected, summary.members_responded
    );
    println!(
        "- tools: requested={} succeeded={} failed={}",
        summary.tool_requested, summary.tool_succeeded, summary.tool_failed
    );

    let mut by_count = summary.command_counts.into_iter().collect::<Vec<_>>();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (name, count) in by_count.into_iter().take(5) {
        println!("- command '{name}': {count}");
    }

    if let Some(last_ts) = summary.last_event_ts_unix_ms {
        let rendered = chrono::DateTime::from_timestamp_millis(last_ts as i64)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| last_ts.to_string());
        println!("- last event: {rendered}");
    }

    Ok(())
}
