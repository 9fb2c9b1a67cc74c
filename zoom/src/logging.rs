//! Log setup for the plugin process

use tracing::Level;

/// Provider-specific level, checked before the global one
pub const PROVIDER_LOG_ENV: &str = "TF_LOG_PROVIDER_ZOOM";
pub const GLOBAL_LOG_ENV: &str = "TF_LOG";

/// Level from a Terraform log setting. `JSON` is Terraform's alias for trace.
pub fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_ascii_uppercase().as_str() {
        "JSON" => Some(Level::TRACE),
        other => other.parse().ok(),
    }
}

pub fn level_from_env() -> Level {
    [PROVIDER_LOG_ENV, GLOBAL_LOG_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find_map(|value| parse_level(&value))
        .unwrap_or(Level::INFO)
}

/// Install the fmt subscriber on stderr. Later calls are no-ops.
pub fn init() {
    let level = level_from_env();
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("Logging initialized at {}", level);
    }
}
