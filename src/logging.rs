use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "ARGWEAVE_LOG";

/// Initialize tracing on stderr.
///
/// `ARGWEAVE_LOG` wins over `default_level`, so `ARGWEAVE_LOG=argweave=trace`
/// shows individual token claims. Stdout stays reserved for parse output.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
