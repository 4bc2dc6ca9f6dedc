//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for PACKCTL_QUIET, PACKCTL_LOG_LEVEL and PACKCTL_LOG_JSON.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup.
///
/// `RUST_LOG` wins over the packctl variables. With PACKCTL_QUIET=1 only WARN
/// and above are logged; `verbose` raises the packctl crates to DEBUG.
pub fn init_tracing(verbose: bool) {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "packctl=warn".to_string()
    } else if verbose {
        "packctl=debug".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // Logs go to stderr so command output on stdout stays pipeable.
    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
