use std::io::{BufRead, Write};

use ragnote_lib::output::ConsoleIO;
use ragnote_lib::runtime::Runtime;
use ragnote_lib::settings::SettingKey;
use tracing::debug;

/// Run the `ragnote config show` command.
pub fn run_config_show<IN, OUT, ERR>(
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let rendered = serde_json::to_string_pretty(&runtime.settings)?;
    writeln!(io.stdout(), "{rendered}")?;
    writeln!(
        io.stderr(),
        "Settings file: {}",
        runtime.settings_path().display()
    )?;
    Ok(())
}

/// Run the `ragnote config set` command.
pub fn run_config_set<IN, OUT, ERR>(
    key: &str,
    value: &str,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let Some(setting) = SettingKey::parse(key) else {
        let valid: Vec<&str> = SettingKey::ALL.into_iter().map(SettingKey::as_str).collect();
        anyhow::bail!("Unknown setting `{key}`. Valid keys: {}", valid.join(", "));
    };

    let mut settings = runtime.settings.clone();
    settings.set(setting, value)?;
    settings.save(&runtime.settings_path())?;
    debug!(key, "Setting updated");

    writeln!(io.stdout(), "Set {key} = {value}")?;
    Ok(())
}
