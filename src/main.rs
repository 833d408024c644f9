use checkin_dashboard::{
    AppState, Config, StoreClient, TargetTable, load_winners, router, spawn_poller,
};
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if config.store_url.is_none() {
        warn!("STORE_URL is not set; the dashboard will stay empty");
    }

    let winners = load_winners(&config.winner_path).await;
    let state = AppState::new(config.winner_path.clone(), TargetTable::preset(), winners);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let source = StoreClient::new(&config)?;
    let poller = spawn_poller(state.clone(), source, config.poll_interval, shutdown_rx);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {err}");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    poller.await?;

    Ok(())
}
