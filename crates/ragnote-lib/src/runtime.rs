use std::path::PathBuf;

use crate::context::RagContext;
use crate::settings::Settings;

/// Everything a command needs: resolved paths plus the settings snapshot
/// loaded at startup.
pub struct Runtime {
    pub context: RagContext,
    pub settings: Settings,
}

impl Runtime {
    pub fn load(context: RagContext) -> anyhow::Result<Self> {
        let settings = Settings::load(&context.settings_path())?;
        Ok(Self { context, settings })
    }

    /// Pick the vault directory: explicit override, then the configured
    /// default, then the working directory. Relative paths resolve against
    /// the working directory.
    pub fn vault_dir(&self, explicit: Option<&str>) -> PathBuf {
        let chosen = explicit
            .map(PathBuf::from)
            .or_else(|| self.settings.vault_dir.clone());
        match chosen {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => self.context.working_dir().join(dir),
            None => self.context.working_dir().to_path_buf(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.context.settings_path()
    }
}
