use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_COMPLETION_MODEL, DEFAULT_EMBEDDING_MODEL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_TOKEN_BUDGET, MAX_TOKEN_BUDGET, MIN_TOKEN_BUDGET,
};

/// Persisted user settings.
///
/// The pipeline receives a clone of this record per query and never mutates
/// it. Fields missing from the file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub token_budget: usize,
    pub request_timeout_secs: u64,
    /// Default vault directory when `--vault` is not given.
    pub vault_dir: Option<PathBuf>,
    /// Embedding-capable model names from the last `models refresh`.
    pub embedding_models: Vec<String>,
    /// Completion model names from the last `models refresh`.
    pub completion_models: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            vault_dir: None,
            embedding_models: Vec::new(),
            completion_models: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, returning defaults when the file does not
    /// exist. A token budget outside the accepted range is clamped and a
    /// zero timeout falls back to the default.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let mut settings: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        let clamped = settings
            .token_budget
            .clamp(MIN_TOKEN_BUDGET, MAX_TOKEN_BUDGET);
        if clamped != settings.token_budget {
            warn!(
                configured = settings.token_budget,
                clamped, "Token budget out of range, clamping"
            );
            settings.token_budget = clamped;
        }
        if settings.request_timeout_secs == 0 {
            let fallback = DEFAULT_REQUEST_TIMEOUT.as_secs();
            warn!(fallback, "Request timeout of 0 seconds, using the default");
            settings.request_timeout_secs = fallback;
        }
        Ok(settings)
    }

    /// Write settings to `path` as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Update one setting by its CLI key.
    pub fn set(&mut self, key: SettingKey, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            SettingKey::BaseUrl => {
                if value.is_empty() {
                    anyhow::bail!("base-url must not be empty");
                }
                self.base_url = value.trim_end_matches('/').to_string();
            }
            SettingKey::EmbeddingModel => self.embedding_model = non_empty(key, value)?,
            SettingKey::CompletionModel => self.completion_model = non_empty(key, value)?,
            SettingKey::TokenBudget => {
                let budget: usize = value
                    .parse()
                    .with_context(|| format!("token-budget must be an integer, got {value:?}"))?;
                if !(MIN_TOKEN_BUDGET..=MAX_TOKEN_BUDGET).contains(&budget) {
                    anyhow::bail!(
                        "token-budget must be between {MIN_TOKEN_BUDGET} and {MAX_TOKEN_BUDGET}, got {budget}"
                    );
                }
                self.token_budget = budget;
            }
            SettingKey::Timeout => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("timeout must be a number of seconds, got {value:?}"))?;
                if secs == 0 {
                    anyhow::bail!("timeout must be at least 1 second");
                }
                self.request_timeout_secs = secs;
            }
            SettingKey::Vault => {
                self.vault_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_empty(key: SettingKey, value: &str) -> anyhow::Result<String> {
    if value.is_empty() {
        anyhow::bail!("{} must not be empty", key.as_str());
    }
    Ok(value.to_string())
}

/// Keys accepted by `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    BaseUrl,
    EmbeddingModel,
    CompletionModel,
    TokenBudget,
    Timeout,
    Vault,
}

impl SettingKey {
    pub const ALL: [Self; 6] = [
        Self::BaseUrl,
        Self::EmbeddingModel,
        Self::CompletionModel,
        Self::TokenBudget,
        Self::Timeout,
        Self::Vault,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "base-url",
            Self::EmbeddingModel => "embedding-model",
            Self::CompletionModel => "completion-model",
            Self::TokenBudget => "token-budget",
            Self::Timeout => "timeout",
            Self::Vault => "vault",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}
