//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PRTHREADS_LOG";

/// Installs the global subscriber.
///
/// `--verbose` wins over `PRTHREADS_LOG`, which wins over the configured level.
pub fn init(config_level: &str, verbose: bool) {
    let filter = build_filter(config_level, verbose, std::env::var(LOG_ENV).ok());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_filter(config_level: &str, verbose: bool, env_level: Option<String>) -> EnvFilter {
    let directive = if verbose {
        "debug".to_owned()
    } else {
        env_level
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| config_level.to_owned())
    };

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}
