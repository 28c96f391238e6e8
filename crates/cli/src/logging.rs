use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `spatialrel=debug`.
pub const LOG_ENV: &str = "SPATIALREL_LOG";

/// Installs the global subscriber. Events go to stderr so stdout stays
/// reserved for command output.
pub fn init_logging(json: bool) -> Result<()> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());
    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    let init_result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    init_result.map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))
}
