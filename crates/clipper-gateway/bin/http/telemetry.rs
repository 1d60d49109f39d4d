use crate::cli::LogFormat;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug";

/// Installs the global subscriber and routes `log` records (emitted by sqlx)
/// into it. `RUST_LOG` overrides the default filter.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    LogTracer::init()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}
