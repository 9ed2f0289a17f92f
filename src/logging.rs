//! Subscriber setup for binaries embedding the SDK.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed, e.g. with [`init_logging`].

use anyhow::anyhow;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install a global subscriber at `level` (overridden by `RUST_LOG`), plus
/// color-eyre's panic and error report hooks.
///
/// Fails if a subscriber or report hook is already installed.
pub fn init_logging(level: &str, json: bool) -> anyhow::Result<()> {
    color_eyre::install().map_err(|e| anyhow!("failed to install error report hook: {e}"))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    if json {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .with(ErrorLayer::default())
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .with(ErrorLayer::default())
            .try_init()?;
    }

    Ok(())
}
