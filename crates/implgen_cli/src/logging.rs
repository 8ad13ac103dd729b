use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

/// Filter for the subscriber: `--log-level` when given, else `RUST_LOG`,
/// else `warn`.
pub fn build_filter(log_level: Option<&str>) -> Result<EnvFilter> {
    if let Some(value) = log_level {
        let trimmed = value.trim();
        let level: LevelFilter = trimmed
            .parse()
            .map_err(|error| anyhow!("invalid --log-level '{}': {}", trimmed, error))?;
        return Ok(EnvFilter::default().add_directive(level.into()));
    }

    Ok(EnvFilter::builder()
        .with_default_directive(DEFAULT_LOG_LEVEL.into())
        .from_env_lossy())
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the command's result.
pub fn init_logging(log_level: Option<&str>) -> Result<()> {
    let filter = build_filter(log_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {}", error))
}
