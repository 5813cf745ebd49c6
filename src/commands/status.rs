use anyhow::Result;
use std::env;

use crate::commands::{CommandReport, open_store};
use crate::openai::client::ClientSettings;
use crate::summary::config::ConfigStore;
use crate::summary::paths::resolve_paths;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

pub const BUILD_ID: &str = env!("BUILD_ID");

fn env_overrides_set() -> Vec<&'static str> {
    GENERATED_ENV_ALLOWLIST
        .iter()
        .copied()
        .filter(|key| env::var(key).is_ok_and(|v| !v.trim().is_empty()))
        .collect()
}

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_id={BUILD_ID}"));
    report.detail(format!("home={}", paths.home.display()));
    report.detail(format!("config_file={}", paths.config_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));

    let settings = ClientSettings::from_env();
    report.detail(format!("api_base={}", settings.api_base));
    match settings.timeout {
        Some(timeout) => report.detail(format!("timeout_secs={}", timeout.as_secs())),
        None => report.detail("timeout_secs=none"),
    }

    let set = env_overrides_set();
    report.detail(format!(
        "env_overrides={}",
        if set.is_empty() {
            "none".to_string()
        } else {
            set.join(",")
        }
    ));

    match open_store(&paths).get() {
        Ok(cfg) => {
            report.detail(format!("has_key={}", cfg.has_key()));
            report.detail(format!("model={}", cfg.model));
            report.detail(format!("target_length={}", cfg.target_length.as_str()));
            if !cfg.has_key() {
                report.issue("no API key configured; run `readeck-sum config set --api-key <KEY>`");
            }
        }
        Err(err) => report.issue(format!("settings unreadable: {err:#}")),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::GENERATED_ENV_ALLOWLIST;

    #[test]
    fn allowlist_covers_known_overrides() {
        for key in [
            "READECK_SUMMARY_HOME",
            "READECK_SUMMARY_API_BASE",
            "READECK_SUMMARY_TIMEOUT_SECS",
            "READECK_SUMMARY_LOG",
        ] {
            assert!(GENERATED_ENV_ALLOWLIST.contains(&key), "{key} missing");
        }
    }
}
