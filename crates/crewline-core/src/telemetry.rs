//! Tracing initialisation shared by Crewline binaries.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is the default filter. With
/// `json = true`, log lines are newline-delimited JSON. Repeated calls are
/// no-ops — the global subscriber can only be installed once per process.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .try_init()
            .ok();
    }
}
