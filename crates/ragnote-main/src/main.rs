use std::process::ExitCode;

use ragnote_cli::logging::init_logging;
use ragnote_lib::context::RagContext;
use ragnote_lib::output::StdIO;
use ragnote_lib::runtime::Runtime;

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        eprintln!("Warning: {err:#}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let context = RagContext::from_env()?;
    let runtime = Runtime::load(context)?;

    let args: Vec<String> = std::env::args().collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut io = StdIO::new();
    ragnote_cli::try_run(&args, &runtime, &mut io)
}
