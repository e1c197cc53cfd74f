//! Log filter selection for the CLI subscriber.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `--verbose` forces debug, otherwise `rust_log`
/// (normally `RUST_LOG`) is used as given, falling back to `warn` when it is
/// unset, blank, or unparseable.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
