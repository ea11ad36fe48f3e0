use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::SETTINGS_FILE;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "RAGNOTE_HOME";

/// Resolved filesystem locations for one invocation.
#[derive(Debug, Clone)]
pub struct RagContext {
    data_dir: PathBuf,
    working_dir: PathBuf,
}

impl RagContext {
    pub fn new(data_dir: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            data_dir,
            working_dir,
        }
    }

    /// Resolve the data directory from `RAGNOTE_HOME`, falling back to
    /// `~/.ragnote`, and take the process working directory as the default
    /// vault location.
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Cannot determine home directory; set RAGNOTE_HOME")?
                .join(".ragnote"),
        };
        let working_dir =
            std::env::current_dir().context("Cannot determine current directory")?;
        Ok(Self::new(data_dir, working_dir))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}
