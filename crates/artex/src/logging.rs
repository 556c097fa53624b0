use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

const DEFAULT_LOG_FILTER: &str = "artex=info,artex_extract=info,artex_source=info";
const VERBOSE_LOG_FILTER: &str = "artex=debug,artex_extract=debug,artex_source=debug,artex_rules=debug";

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}
