//! Tracing subscriber setup for the binary.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, defaulting to `warn` so that normal
/// output stays clean. An unparseable `RUST_LOG` falls back to the default.
pub fn init_logger() {
    let default_level = LevelFilter::WARN;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });

    let result = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();

    if let Err(err) = result {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}
