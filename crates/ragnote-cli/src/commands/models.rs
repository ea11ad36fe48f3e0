use std::io::{BufRead, Write};

use ragnote_lib::output::ConsoleIO;
use ragnote_lib::runtime::Runtime;
use ragnote_lib::service::http::ServiceClient;
use ragnote_lib::service::models::{ModelCatalog, list_models};

/// Run the `ragnote models list` command.
pub fn run_models_list<IN, OUT, ERR>(
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let catalog = fetch_catalog(runtime)?;
    write_section(io.stdout(), "Embedding models", &catalog.embedding)?;
    write_section(io.stdout(), "Completion models", &catalog.completion)?;
    Ok(())
}

/// Run the `ragnote models refresh` command: fetch the installed models and
/// store both lists in the settings file.
pub fn run_models_refresh<IN, OUT, ERR>(
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let catalog = fetch_catalog(runtime)?;

    let mut settings = runtime.settings.clone();
    settings.embedding_models.clone_from(&catalog.embedding);
    settings.completion_models.clone_from(&catalog.completion);
    settings.save(&runtime.settings_path())?;

    writeln!(
        io.stdout(),
        "Saved {} embedding and {} completion models.",
        catalog.embedding.len(),
        catalog.completion.len()
    )?;
    if !catalog.embedding.contains(&settings.embedding_model) {
        writeln!(
            io.stderr(),
            "Warning: configured embedding model `{}` is not installed.",
            settings.embedding_model
        )?;
    }
    if !catalog.completion.contains(&settings.completion_model) {
        writeln!(
            io.stderr(),
            "Warning: configured completion model `{}` is not installed.",
            settings.completion_model
        )?;
    }
    Ok(())
}

fn fetch_catalog(runtime: &Runtime) -> anyhow::Result<ModelCatalog> {
    let service = ServiceClient::new(
        &runtime.settings.base_url,
        runtime.settings.request_timeout(),
    )?;
    Ok(list_models(&service)?)
}

fn write_section<W: Write + ?Sized>(
    out: &mut W,
    title: &str,
    names: &[String],
) -> anyhow::Result<()> {
    writeln!(out, "{title}:")?;
    if names.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for name in names {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}
