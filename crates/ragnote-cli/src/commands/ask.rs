use std::io::{BufRead, Write};

use ragnote_lib::config::{MAX_TOKEN_BUDGET, MIN_TOKEN_BUDGET};
use ragnote_lib::output::ConsoleIO;
use ragnote_lib::pipeline::{Outcome, Pipeline};
use ragnote_lib::pipeline::rank::similarity_percent;
use ragnote_lib::runtime::Runtime;
use ragnote_lib::vault::DirectoryVault;
use tracing::debug;

/// Run the `ragnote ask` command.
pub fn run_ask<IN, OUT, ERR>(
    query: &str,
    vault: Option<&str>,
    budget: Option<usize>,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Query must not be empty.");
    }

    let pipeline = build_pipeline(runtime, budget)?;
    let store = DirectoryVault::new(runtime.vault_dir(vault));
    debug!(vault = %store.root().display(), "Running query");

    let outcome = pipeline.run(&store, query)?;
    write_outcome(&outcome, io.stdout())
}

/// Build a pipeline from the runtime settings, applying a `--budget`
/// override after checking it against the accepted range.
pub(crate) fn build_pipeline(
    runtime: &Runtime,
    budget: Option<usize>,
) -> anyhow::Result<Pipeline> {
    let pipeline = Pipeline::new(&runtime.settings)?;
    let Some(budget) = budget else {
        return Ok(pipeline);
    };
    if !(MIN_TOKEN_BUDGET..=MAX_TOKEN_BUDGET).contains(&budget) {
        anyhow::bail!(
            "--budget must be between {MIN_TOKEN_BUDGET} and {MAX_TOKEN_BUDGET}, got {budget}"
        );
    }
    Ok(pipeline.with_token_budget(budget))
}

/// Print an answer followed by its sources, or the no-match notice.
pub(crate) fn write_outcome<W: Write + ?Sized>(
    outcome: &Outcome,
    out: &mut W,
) -> anyhow::Result<()> {
    match outcome {
        Outcome::NoMatches => writeln!(out, "No matching notes found.")?,
        Outcome::Answered(answer) => {
            writeln!(out, "{}", answer.text.trim_end())?;
            if !answer.sources.is_empty() {
                writeln!(out, "\nSources:")?;
                for source in &answer.sources {
                    writeln!(
                        out,
                        "- {} ({:.1}%)",
                        source.document_id,
                        similarity_percent(source.similarity)
                    )?;
                }
            }
        }
    }
    Ok(())
}
