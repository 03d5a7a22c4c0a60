use resolvesuite_core::DeploymentMode;
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "resolvesuite=debug,tower_http=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Initialize tracing.
///
/// Development logs a compact console format; production emits one JSON object per event
/// so the hosting platform can index the structured fields. Calling this again after a
/// subscriber is installed is a no-op.
pub fn init_telemetry(mode: DeploymentMode) {
    let result = if mode.is_production() {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(env_filter())
            .with(console_fmt)
            .try_init()
    };

    match result {
        Ok(()) => tracing::info!(mode = %mode, "Tracing initialized"),
        Err(e) => tracing::debug!(error = %e, "Tracing subscriber already installed"),
    }
}
