use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "RAGNOTE_LOG";

/// Set to `json` to emit JSON lines instead of human-readable logs.
pub const LOG_FORMAT_ENV: &str = "RAGNOTE_LOG_FORMAT";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the global subscriber. Logs go to stderr; stdout carries answers.
pub fn init_logging() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let format = std::env::var(LOG_FORMAT_ENV).ok();
    let result = if wants_json(format.as_deref()) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
