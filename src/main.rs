use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::app::{gateway_router, AppState};
use authgate::config::{self, Config};
use authgate::store::memory::MemoryStore;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "authgate=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let port = match args.command {
        Some(cli::Commands::Serve { port }) => port.unwrap_or(cfg.port),
        None => cfg.port,
    };

    run_server(cfg, port).await
}

async fn run_server(cfg: Config, port: u16) -> anyhow::Result<()> {
    let store = match &cfg.seed_path {
        Some(path) => {
            tracing::info!(%path, "loading identity seed");
            MemoryStore::from_seed_file(path)?
        }
        None => MemoryStore::new(),
    };
    if store.is_empty() {
        tracing::warn!("credential store holds no users; every request will be rejected");
    }

    let state = Arc::new(AppState::new(Arc::new(store), cfg));
    let app = gateway_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("authgate listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
