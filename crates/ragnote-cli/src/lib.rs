pub mod cli;
pub mod commands;
pub mod logging;

#[cfg(test)]
pub mod test_util;

use std::io::{BufRead, Write};

use clap::Parser;

use ragnote_lib::output::ConsoleIO;
use ragnote_lib::runtime::Runtime;

use cli::{Cli, Command, ConfigCommand, ModelsCommand};

/// Main CLI entry point. Parses args and dispatches to the appropriate command.
pub fn try_run<IN, OUT, ERR>(
    args: &[&str],
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let cli = Cli::try_parse_from(args)?;

    match cli.command {
        Command::Ask {
            query,
            vault,
            budget,
        } => commands::ask::run_ask(&query.join(" "), vault.as_deref(), budget, runtime, io),
        Command::Chat { vault, budget } => {
            commands::chat::run_chat(vault.as_deref(), budget, runtime, io)
        }
        Command::Models { models_command } => match models_command {
            ModelsCommand::List => commands::models::run_models_list(runtime, io),
            ModelsCommand::Refresh => commands::models::run_models_refresh(runtime, io),
        },
        Command::Config { config_command } => match config_command {
            ConfigCommand::Show => commands::config::run_config_show(runtime, io),
            ConfigCommand::Set { key, value } => {
                commands::config::run_config_set(&key, &value, runtime, io)
            }
        },
    }
}
