use ndns_domain::Config;
use tracing::info;

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    let config = Config::load(config_path)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        anchors = config.trust.anchors.len(),
        chain_limit = config.trust.chain_limit,
        interest_lifetime_ms = config.query.interest_lifetime_ms,
        "Configuration loaded"
    );

    Ok(config)
}
