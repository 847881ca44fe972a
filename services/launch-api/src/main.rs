use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use launchpad_core::{logging, Config};

mod error;
mod handlers;
mod pagination;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(config.server.log_format);

    let state = Arc::new(AppState::new(config.clone())?);
    let outcome = state.prepare().await?;
    info!(?outcome, "Launch data ready");

    let app = routes::router(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Launch API listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
