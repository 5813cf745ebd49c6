use crate::summary::paths::SummaryPaths;
use crate::summary::util::now_epoch_secs;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub at_epoch_secs: u64,
    pub phase: String,
    pub status: String,
    pub message: String,
}

pub fn append_event(paths: &SummaryPaths, phase: &str, status: &str, message: &str) -> Result<()> {
    fs::create_dir_all(&paths.logs_dir)
        .with_context(|| format!("failed to create {}", paths.logs_dir.display()))?;
    let event = AuditEvent {
        at_epoch_secs: now_epoch_secs()?,
        phase: phase.to_string(),
        status: status.to_string(),
        message: message.to_string(),
    };

    let line = format!("{}\n", serde_json::to_string(&event)?);
    let path = paths.logs_dir.join("audit.log");
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Best-effort variant for call sites where auditing must not fail the run.
pub fn record(paths: Option<&SummaryPaths>, phase: &str, status: &str, message: &str) {
    let Some(paths) = paths else {
        return;
    };
    if let Err(err) = append_event(paths, phase, status, message) {
        tracing::warn!(error = %format!("{err:#}"), "audit log append failed");
    }
}

#[cfg(test)]
mod tests {
    use super::append_event;
    use crate::summary::paths::SummaryPaths;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn append_event_writes_one_json_line_per_call() {
        let tmp = tempdir().expect("tempdir");
        let paths = SummaryPaths {
            home: tmp.path().to_path_buf(),
            config_file: tmp.path().join("config.toml"),
            logs_dir: tmp.path().join("logs"),
        };

        append_event(&paths, "summarize", "ok", "chunks=1").expect("first event");
        append_event(&paths, "summarize", "error", "OpenAI HTTP 500").expect("second event");

        let raw = fs::read_to_string(paths.logs_dir.join("audit.log")).expect("read audit");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("json line");
        assert_eq!(first["phase"], "summarize");
        assert_eq!(first["status"], "ok");
        assert!(lines[1].contains("OpenAI HTTP 500"));
    }
}
