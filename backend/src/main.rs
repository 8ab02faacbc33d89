use std::net::SocketAddr;

use tracing::{info, Level};

mod db;
mod domain;
mod rest;

use domain::PersonService;
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    info!("Setting up application state");
    let state = AppState::new(PersonService::new(db));

    let app = rest::create_router(state);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
