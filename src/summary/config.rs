use crate::summary::types::TargetLength;
use anyhow::{Context, Result, anyhow};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-5-nano";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub api_key: String,
    pub model: String,
    pub target_length: TargetLength,
}

impl Configuration {
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Partial update; `None` keeps the stored value. `Some("")` for the API key
/// clears it, for the model it restores the default.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub target_length: Option<TargetLength>,
}

/// On-disk shape, keyed like the extension's storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_summary_length: Option<String>,
}

impl StoredSettings {
    fn resolve(&self) -> Configuration {
        let model = match self.openai_model.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => DEFAULT_MODEL.to_string(),
        };
        Configuration {
            api_key: self.openai_api_key.clone().unwrap_or_default(),
            model,
            target_length: self
                .max_summary_length
                .as_deref()
                .map(TargetLength::parse_lenient)
                .unwrap_or_default(),
        }
    }

    fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(key) = &update.api_key {
            self.openai_api_key = Some(key.trim().to_string());
        }
        if let Some(model) = &update.model {
            let trimmed = model.trim();
            self.openai_model = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(length) = update.target_length {
            self.max_summary_length = Some(length.as_str().to_string());
        }
    }
}

pub trait ConfigStore {
    /// Current settings with defaults filled in.
    fn get(&self) -> Result<Configuration>;
    /// Merge `update` into the persisted settings.
    fn set(&self, update: &ConfigUpdate) -> Result<()>;
}

pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.toml".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn read(&self) -> Result<StoredSettings> {
        if !self.path.exists() {
            return Ok(StoredSettings::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        toml::from_str(&raw)
            .map_err(|err| anyhow!("failed to parse settings {}: {err}", self.path.display()))
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self) -> Result<Configuration> {
        Ok(self.read()?.resolve())
    }

    fn set(&self, update: &ConfigUpdate) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let lock_path = self.lock_path();
        let lock = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("failed to open {}", lock_path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("failed to lock {}", lock_path.display()))?;

        let result = (|| -> Result<()> {
            let mut stored = self.read()?;
            stored.apply(update);
            let data = toml::to_string_pretty(&stored)?;
            fs::write(&self.path, data)
                .with_context(|| format!("failed to write {}", self.path.display()))
        })();

        let _ = FileExt::unlock(&lock);
        result
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryConfigStore {
    inner: std::sync::Mutex<StoredSettings>,
}

#[cfg(test)]
impl MemoryConfigStore {
    pub fn with_api_key(key: &str) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.inner.lock() {
            guard.openai_api_key = Some(key.to_string());
        }
        store
    }
}

#[cfg(test)]
impl ConfigStore for MemoryConfigStore {
    fn get(&self) -> Result<Configuration> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.resolve())
    }

    fn set(&self, update: &ConfigUpdate) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        guard.apply(update);
        Ok(())
    }
}
