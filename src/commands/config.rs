use anyhow::{Result, bail};

use crate::commands::{CommandReport, open_store};
use crate::summary::config::{ConfigStore, ConfigUpdate};
use crate::summary::paths::resolve_paths;
use crate::summary::types::TargetLength;

#[derive(Debug, Clone, Default)]
pub struct ConfigSetOptions {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub length: Option<String>,
}

fn parse_length(raw: &str) -> Result<TargetLength> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "short" => Ok(TargetLength::Short),
        "medium" => Ok(TargetLength::Medium),
        "long" => Ok(TargetLength::Long),
        other => bail!("invalid length `{other}`; use `short`, `medium`, or `long`"),
    }
}

pub fn show() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let store = open_store(&paths);
    let cfg = store.get()?;
    let mut report = CommandReport::new("config-show");

    report.detail(format!("config_file={}", store.path().display()));
    report.detail(format!("has_key={}", cfg.has_key()));
    report.detail(format!("model={}", cfg.model));
    report.detail(format!("target_length={}", cfg.target_length.as_str()));
    Ok(report)
}

pub fn set(opts: &ConfigSetOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("config-set");
    if opts.api_key.is_none() && opts.model.is_none() && opts.length.is_none() {
        report.issue("nothing to set; pass --api-key, --model, or --length");
        return Ok(report);
    }

    let target_length = match opts.length.as_deref() {
        Some(raw) => match parse_length(raw) {
            Ok(length) => Some(length),
            Err(err) => {
                report.issue(err.to_string());
                return Ok(report);
            }
        },
        None => None,
    };

    let paths = resolve_paths()?;
    let store = open_store(&paths);
    store.set(&ConfigUpdate {
        api_key: opts.api_key.clone(),
        model: opts.model.clone(),
        target_length,
    })?;

    let cfg = store.get()?;
    report.detail("saved");
    report.detail(format!("has_key={}", cfg.has_key()));
    report.detail(format!("model={}", cfg.model));
    report.detail(format!("target_length={}", cfg.target_length.as_str()));
    Ok(report)
}

pub fn clear_key() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let store = open_store(&paths);
    store.set(&ConfigUpdate {
        api_key: Some(String::new()),
        ..ConfigUpdate::default()
    })?;

    let mut report = CommandReport::new("config-clear-key");
    report.detail("key cleared");
    Ok(report)
}
