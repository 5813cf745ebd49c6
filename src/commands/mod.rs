pub mod bridge;
pub mod config;
pub mod status;
pub mod summarize;

use serde::Serialize;

use crate::openai::client::{ClientSettings, OpenAiClient};
use crate::summary::config::FileConfigStore;
use crate::summary::paths::SummaryPaths;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

pub fn open_store(paths: &SummaryPaths) -> FileConfigStore {
    FileConfigStore::new(&paths.config_file)
}

pub fn open_client() -> anyhow::Result<OpenAiClient> {
    OpenAiClient::new(&ClientSettings::from_env())
}

#[cfg(test)]
mod tests {
    use super::CommandReport;

    #[test]
    fn issue_flips_ok() {
        let mut report = CommandReport::new("status");
        report.detail("has_key=false");
        assert!(report.ok);
        report.issue("no API key configured");
        assert!(!report.ok);
        assert_eq!(report.details, vec!["has_key=false".to_string()]);
        assert_eq!(report.issues.len(), 1);
    }
}
