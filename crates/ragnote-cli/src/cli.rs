use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ragnote",
    version,
    about = "Answer questions from your notes with a local LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single question from the notes in the vault.
    Ask {
        /// The question. Multiple words are joined with spaces.
        #[arg(required = true)]
        query: Vec<String>,
        /// Vault directory (defaults to the configured vault, then the
        /// current directory).
        #[arg(long)]
        vault: Option<String>,
        /// Approximate token budget for retrieved context.
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Read questions from stdin, one per line, until EOF or `exit`.
    Chat {
        #[arg(long)]
        vault: Option<String>,
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Inspect the models installed on the service.
    Models {
        #[command(subcommand)]
        models_command: ModelsCommand,
    },

    /// Show or change persisted settings.
    Config {
        #[command(subcommand)]
        config_command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List installed models split into embedding and completion models.
    List,
    /// Fetch the model lists and store them in settings.
    Refresh,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings as JSON.
    Show,
    /// Change one setting.
    Set {
        /// One of: base-url, embedding-model, completion-model,
        /// token-budget, timeout, vault.
        key: String,
        value: String,
    },
}
