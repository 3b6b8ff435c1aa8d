//! Tracing setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Initializes structured logging with tracing.
///
/// Supports two output formats via `PROXYSWITCH_LOG_FORMAT` environment variable:
/// - `json`: Machine-readable JSON logs
/// - `pretty`: Human-readable formatted logs (default)
///
/// Log level is controlled via `RUST_LOG`. Logs go to stderr so stdout only
/// carries status lines.
pub fn init_tracing() {
    let format = std::env::var("PROXYSWITCH_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string())
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("proxyswitch_core=warn,proxyswitch_cli=warn"));

    match format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .init();
        }
    }
}
