//! AIMMO Player - headless composition root binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aimmo_player::config::PlayerConfig;
use aimmo_player::features::EpicDeps;
use aimmo_player::infrastructure::{HttpCodeApi, WebSocketGameConnection};
use aimmo_player::runner::Runner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aimmo_player=debug,aimmo_store=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AIMMO Player");

    let config = PlayerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        game_id = %config.connection.game_id,
        game_url = %config.connection.game_url,
        "Configuration loaded"
    );

    let deps = EpicDeps {
        code_api: Arc::new(HttpCodeApi::new(&config.api_url).context("Failed to create code API client")?),
        game_connection: Arc::new(WebSocketGameConnection::default()),
        default_game: config.connection.game_id,
    };
    let runner = Runner::new(&config, &deps)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl-C");
                shutdown.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    let state = runner.run(cancel).await?;
    tracing::info!(
        turn = ?state.game.turn(),
        unsaved_code = state.editor.has_unsaved_changes(),
        "Player stopped"
    );
    Ok(())
}
