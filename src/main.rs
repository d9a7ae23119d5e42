use anyhow::Context;
use meetdesk_lib::config::Config;
use meetdesk_lib::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_logging(&config.log_filter, config.log_format).context("failed to initialize logging")?;

    log::info!(
        "Starting meetdesk on {}:{} (demo data: {})",
        config.bind_address,
        config.port,
        config.seed_demo_data
    );
    meetdesk_lib::run(config).await
}
