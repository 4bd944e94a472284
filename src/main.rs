//! Bingo scout — draw-history scoring dashboard.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the draw feed into the scoring engine, and serves the dashboard
//! until Ctrl+C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use bingo_scout::config;
use bingo_scout::dashboard::{self, routes::DashboardState};
use bingo_scout::engine::ScoringEngine;
use bingo_scout::feed::winwin::WinWinClient;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path =
        std::env::var("BINGO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::AppConfig::load_or_default(&config_path)?;

    info!(
        config = %config_path,
        feed = %cfg.feed.base_url,
        drag_weight = cfg.scoring.drag_weight,
        squad_plans = cfg.scoring.squads.len(),
        merge_previous_day = cfg.feed.merge_previous_day,
        "Bingo scout starting up"
    );

    let source = WinWinClient::new(
        &cfg.feed.base_url,
        cfg.feed.timeout(),
        &cfg.feed.user_agent,
    )?;

    let state = Arc::new(DashboardState::new(
        ScoringEngine::new(cfg.scoring.clone()),
        Arc::new(source),
        cfg.feed.clone(),
    ));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address: {}:{}",
                cfg.server.host, cfg.server.port
            )
        })?;

    dashboard::serve(state, addr).await?;

    info!("Bingo scout shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bingo_scout=info"));

    let json_logging = std::env::var("BINGO_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
