use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;

use server::http::{self, AppState};
use server::persistence;

/// Main-method of the application.
/// Parses command-line arguments, wires up the shared state, then serves
/// the HTTP API until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "5000")]
        port: u16,
        /// MongoDB connection string
        #[clap(long, env = "MONGO_URI")]
        mongo_uri: Option<String>,
    }

    let args = Args::parse();
    env_logger::init();

    let state = AppState::new();

    // Persistence is optional: without a connection string the in-memory
    // core still serves every route.
    match args.mongo_uri {
        Some(uri) => persistence::spawn_connector(Arc::clone(&state), uri),
        None => warn!("MONGO_URI not set, running without persistence"),
    }

    let app = http::router(Arc::clone(&state));
    let address = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
