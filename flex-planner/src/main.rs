use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flex_planner::config::ServerConfig;
use flex_planner::flex::DirectDistanceCalculator;
use flex_planner::request::{RequestValidator, ValidatorConfig};
use flex_planner::transit::RouterRegistry;
use flex_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "flex planner stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Loading reads every feed from disk
    let data_dir = config.data_dir.clone();
    let registry = tokio::task::spawn_blocking(move || RouterRegistry::load_dir(&data_dir)).await??;

    let state = AppState::new(
        registry,
        RequestValidator::new(ValidatorConfig::default()),
        DirectDistanceCalculator::default(),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "flex planner listening");
    info!("endpoints: GET /health, GET /plan");

    axum::serve(listener, app).await?;
    Ok(())
}
