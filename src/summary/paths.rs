use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SummaryPaths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

pub fn resolve_paths() -> Result<SummaryPaths> {
    let home = match env_path("READECK_SUMMARY_HOME") {
        Some(path) => path,
        None => required_home_dir()?.join(".readeck-summarizer"),
    };
    let config_file =
        env_path("READECK_SUMMARY_CONFIG_PATH").unwrap_or_else(|| home.join("config.toml"));
    let logs_dir = home.join("logs");

    Ok(SummaryPaths {
        home,
        config_file,
        logs_dir,
    })
}
