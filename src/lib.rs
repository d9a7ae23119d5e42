pub mod api;
pub mod config;
pub mod db;
pub mod devtools;
pub mod error;
pub mod latency;
pub mod logging;
pub mod services;
pub mod state;
pub mod types;
pub mod util;

use std::sync::Arc;

use anyhow::Context;

use config::Config;
use state::AppState;

/// Build state from `config` and serve until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config).context("failed to seed demo data")?);
    api::setup_and_serve(state).await
}
