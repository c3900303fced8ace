//! Shared components for CLI commands

use crate::cli::args::CommonArgs;
use crate::error::{AqiError, Result};
use crate::processor::AirQualityProcessor;
use tracing::debug;

/// Set up structured logging on stderr
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aqi_processor={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AqiError::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Validate arguments and build a configured processor
pub fn build_processor(args: &CommonArgs) -> Result<AirQualityProcessor> {
    args.validate()?;
    let config = args.to_config()?;
    debug!("Resolved configuration: {:?}", config);

    Ok(AirQualityProcessor::new(args.input_path(), args.output_path()).with_config(config))
}
