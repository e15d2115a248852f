//! Workflow recording, stage timing, and structured run artifacts.

use crate::runtime::artifacts::ArtifactManager;
use crate::runtime::error::{XtaskError, XtaskResult};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize)]
struct StageRecord {
    name: String,
    started_unix_ms: u64,
    duration_ms: u128,
    status: String,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RunManifest {
    workflow: String,
    target: Option<String>,
    started_at: String,
    started_unix_ms: u64,
    finished_unix_ms: u64,
    duration_ms: u128,
    status: String,
    error: Option<String>,
    run_dir: String,
    command: String,
    stages: Vec<StageRecord>,
    warnings: Vec<String>,
}

#[derive(Debug)]
struct ActiveRun {
    workflow: String,
    target: Option<String>,
    started_at: String,
    started_unix_ms: u64,
    started_instant: Instant,
    run_dir: PathBuf,
    manifest_path: PathBuf,
    events_path: PathBuf,
    command: String,
    stages: Vec<StageRecord>,
    warnings: Vec<String>,
}

static ACTIVE_RUN: OnceLock<Mutex<Option<ActiveRun>>> = OnceLock::new();

fn active_run() -> &'static Mutex<Option<ActiveRun>> {
    ACTIVE_RUN.get_or_init(|| Mutex::new(None))
}

/// Shared workflow recorder service.
///
/// `WorkflowRecorder` provides the stable console and artifact vocabulary for xtask workflows.
/// Command families execute through [`with_workflow_run`](Self::with_workflow_run), nest each
/// generator in [`run_timed_stage`](Self::run_timed_stage), and report degraded states through
/// [`warn`](Self::warn) so they land in both the terminal and the run's event log.
#[derive(Clone, Debug)]
pub struct WorkflowRecorder {
    artifacts: ArtifactManager,
}

impl WorkflowRecorder {
    /// Create a recorder service.
    pub fn new(artifacts: ArtifactManager) -> Self {
        Self { artifacts }
    }

    /// Run a workflow with manifest and event recording.
    ///
    /// This method creates a run directory under `.artifacts/automation/runs/`, emits the
    /// `workflow_started` and `workflow_finished` events, and writes a manifest summarizing the
    /// run outcome. The action's result is returned unchanged.
    pub fn with_workflow_run<F>(
        &self,
        workflow: &str,
        target: Option<String>,
        action: F,
    ) -> XtaskResult<()>
    where
        F: FnOnce() -> XtaskResult<()>,
    {
        let run = self.begin_workflow_run(workflow, target)?;
        {
            let mut guard = active_run()
                .lock()
                .map_err(|_| XtaskError::io("failed to lock workflow recorder"))?;
            *guard = Some(run);
        }

        let result = action();
        self.finish_workflow_run(result.as_ref().err().cloned())?;
        result
    }

    fn begin_workflow_run(&self, workflow: &str, target: Option<String>) -> XtaskResult<ActiveRun> {
        let started_unix_ms = unix_timestamp_millis();
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let run_dir = self
            .artifacts
            .automation_runs_dir()
            .join(format!("{started_unix_ms}-{workflow}"));
        self.artifacts.ensure_dir(&run_dir)?;

        let events_path = run_dir.join("events.jsonl");
        let manifest_path = run_dir.join("manifest.json");
        fs::write(&events_path, "").map_err(|err| {
            XtaskError::io(format!(
                "failed to initialize {}: {err}",
                events_path.display()
            ))
        })?;

        append_run_event(
            &events_path,
            serde_json::json!({
                "type": "workflow_started",
                "workflow": workflow,
                "target": target,
                "timestamp_unix_ms": started_unix_ms
            }),
        )?;

        Ok(ActiveRun {
            workflow: workflow.to_string(),
            target,
            started_at,
            started_unix_ms,
            started_instant: Instant::now(),
            run_dir,
            manifest_path,
            events_path,
            command: env::args().collect::<Vec<_>>().join(" "),
            stages: Vec::new(),
            warnings: Vec::new(),
        })
    }

    fn finish_workflow_run(&self, error: Option<XtaskError>) -> XtaskResult<()> {
        let mut guard = active_run()
            .lock()
            .map_err(|_| XtaskError::io("failed to lock workflow recorder"))?;
        let Some(run) = guard.take() else {
            return Ok(());
        };

        let finished_unix_ms = unix_timestamp_millis();
        let status = if error.is_none() { "ok" } else { "failed" }.to_string();
        let manifest = RunManifest {
            workflow: run.workflow.clone(),
            target: run.target.clone(),
            started_at: run.started_at.clone(),
            started_unix_ms: run.started_unix_ms,
            finished_unix_ms,
            duration_ms: run.started_instant.elapsed().as_millis(),
            status: status.clone(),
            error: error.as_ref().map(ToString::to_string),
            run_dir: run.run_dir.display().to_string(),
            command: run.command.clone(),
            stages: run.stages,
            warnings: run.warnings,
        };

        append_run_event(
            &run.events_path,
            serde_json::json!({
                "type": "workflow_finished",
                "workflow": run.workflow,
                "timestamp_unix_ms": finished_unix_ms,
                "status": status,
                "error": error.as_ref().map(ToString::to_string)
            }),
        )?;

        let manifest_json = serde_json::to_string_pretty(&manifest)
            .map_err(|err| XtaskError::io(format!("failed to serialize run manifest: {err}")))?;
        fs::write(&run.manifest_path, manifest_json).map_err(|err| {
            XtaskError::io(format!(
                "failed to write {}: {err}",
                run.manifest_path.display()
            ))
        })?;
        println!("    run record: {}", run.manifest_path.display());

        Ok(())
    }

    /// Record a stage with timing and structured events.
    ///
    /// The stage result is propagated to the caller unchanged after the corresponding
    /// `stage_started` and `stage_finished` events are recorded.
    pub fn run_timed_stage<T, F>(&self, message: &str, action: F) -> XtaskResult<T>
    where
        F: FnOnce() -> XtaskResult<T>,
    {
        println!("\n==> {message}");
        let started = Instant::now();
        let started_unix_ms = unix_timestamp_millis();
        append_active_run_event(serde_json::json!({
            "type": "stage_started",
            "name": message,
            "timestamp_unix_ms": started_unix_ms
        }))?;

        let result = action();
        let elapsed = started.elapsed();
        let stage = StageRecord {
            name: message.to_string(),
            started_unix_ms,
            duration_ms: elapsed.as_millis(),
            status: if result.is_ok() { "ok" } else { "failed" }.to_string(),
            error: result.as_ref().err().map(ToString::to_string),
        };
        record_stage_event(stage, unix_timestamp_millis())?;
        match &result {
            Ok(_) => println!("    done in {}", format_duration(elapsed)),
            Err(_) => println!("    failed in {}", format_duration(elapsed)),
        }
        result
    }

    /// Print a warning using the shared workflow output style and record it on the active run.
    ///
    /// Within one run a message is reported once; repeats from later stages are dropped.
    pub fn warn(&self, message: &str) -> XtaskResult<()> {
        let mut guard = active_run()
            .lock()
            .map_err(|_| XtaskError::io("failed to lock workflow recorder"))?;
        let Some(run) = guard.as_mut() else {
            println!("[warn] {message}");
            return Ok(());
        };
        if run.warnings.iter().any(|seen| seen == message) {
            return Ok(());
        }
        println!("[warn] {message}");
        append_run_event(
            &run.events_path,
            serde_json::json!({
                "type": "warning",
                "message": message,
                "timestamp_unix_ms": unix_timestamp_millis()
            }),
        )?;
        run.warnings.push(message.to_string());
        Ok(())
    }
}

fn append_run_event(path: &Path, event: serde_json::Value) -> XtaskResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| XtaskError::io(format!("failed to open {}: {err}", path.display())))?;
    let line = serde_json::to_string(&event)
        .map_err(|err| XtaskError::io(format!("failed to serialize run event: {err}")))?;
    use std::io::Write as _;
    writeln!(&mut file, "{line}")
        .map_err(|err| XtaskError::io(format!("failed to append {}: {err}", path.display())))
}

fn append_active_run_event(event: serde_json::Value) -> XtaskResult<()> {
    let guard = active_run()
        .lock()
        .map_err(|_| XtaskError::io("failed to lock workflow recorder"))?;
    let Some(run) = guard.as_ref() else {
        return Ok(());
    };
    append_run_event(&run.events_path, event)
}

fn record_stage_event(stage: StageRecord, end_timestamp_unix_ms: u64) -> XtaskResult<()> {
    let mut guard = active_run()
        .lock()
        .map_err(|_| XtaskError::io("failed to lock workflow recorder"))?;
    let Some(run) = guard.as_mut() else {
        return Ok(());
    };
    append_run_event(
        &run.events_path,
        serde_json::json!({
            "type": "stage_finished",
            "name": stage.name,
            "started_unix_ms": stage.started_unix_ms,
            "finished_unix_ms": end_timestamp_unix_ms,
            "duration_ms": stage.duration_ms,
            "status": stage.status,
            "error": stage.error
        }),
    )?;
    run.stages.push(stage);
    Ok(())
}

/// Format a duration for human-readable terminal output.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs >= 60 {
        let minutes = secs / 60;
        let rem_secs = secs % 60;
        format!("{minutes}m {rem_secs}.{millis:03}s")
    } else {
        format!("{secs}.{millis:03}s")
    }
}

/// Return the current unix timestamp in milliseconds.
pub fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Serializes tests that touch the process-wide active run.
#[cfg(test)]
pub(crate) fn workflow_test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}
