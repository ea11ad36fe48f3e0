use std::io::{BufRead, Write};

use ragnote_lib::output::ConsoleIO;
use ragnote_lib::runtime::Runtime;
use ragnote_lib::vault::DirectoryVault;
use tracing::debug;

use super::ask::{build_pipeline, write_outcome};

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Run the `ragnote chat` loop: one query per input line until EOF or
/// `exit`. A failed query is reported and the loop keeps going.
pub fn run_chat<IN, OUT, ERR>(
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
    let pipeline = build_pipeline(runtime, budget)?;
    let store = DirectoryVault::new(runtime.vault_dir(vault));

    writeln!(
        io.stderr(),
        "Asking notes in {} (type `exit` to quit)",
        store.root().display()
    )?;

    loop {
        write!(io.stderr(), "> ")?;
        io.stderr().flush()?;
        let Some(line) = io.read_line()? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&query) {
            break;
        }

        debug!(query_len = query.len(), "Chat query");
        match pipeline.run(&store, query) {
            Ok(outcome) => write_outcome(&outcome, io.stdout())?,
            Err(err) => writeln!(io.stderr(), "Error: {err}")?,
        }
    }

    writeln!(io.stderr())?;
    Ok(())
}
