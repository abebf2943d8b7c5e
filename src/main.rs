use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use agency_backend::{
    config::AppConfig, db, pdf::PdfRenderer, routes, seed, state::AppState, store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "api",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        server_host = %config.server_host,
        server_port = config.server_port,
        company = %config.company.name,
        seed_demo_data = config.seed_demo_data,
        "loaded backend configuration"
    );
    if !config.admin_routes_enabled() {
        tracing::warn!("ADMIN_API_KEY is empty, admin routes will reject every request");
    }

    let pool = db::init_pool(&config.database_url, config.database_max_pool_size)?;
    let store = Arc::new(PgStore::new(pool));
    let renderer = Arc::new(tokio::task::spawn_blocking(PdfRenderer::new).await?);

    if config.seed_demo_data {
        seed::spawn_seed(store.clone());
    }

    let listen_addr: SocketAddr =
        format!("{}:{}", config.server_host, config.server_port).parse()?;
    let state = AppState::new(store, config, renderer);
    let router = routes::create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("server running on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        tracing::info!("received shutdown signal");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
