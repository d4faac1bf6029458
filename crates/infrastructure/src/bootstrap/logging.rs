use ndns_domain::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber; later calls are no-ops
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_env_filter(filter)
        .with_ansi(true)
        .try_init()
        .is_ok();

    if installed {
        info!("Logging initialized at level: {}", config.level);
    }
}
