//! Tracing initialization.

use paveai_core::Config;
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the tracing subscriber: env-filterable, compact console output.
pub fn init_telemetry(config: &Config) {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paveai=debug,tower_http=debug".into()),
        )
        .with(console_fmt)
        .init();

    tracing::info!(environment = %config.environment, "Telemetry initialized");
}
