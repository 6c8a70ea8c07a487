//! Logging setup.
//!
//! Output goes to stderr so that stdout stays free for transaction JSON piped
//! through the CLI.

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG` overrides
/// `default_level` when set. Calling this more than once has no effect.
pub fn init_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Logs the id of the current process.
pub fn log_process_id() -> u32 {
    let pid = std::process::id();
    info!("This process id is: {}", pid);
    pid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_logging("debug");
        init_logging("info");
        assert_eq!(log_process_id(), std::process::id());
    }
}
