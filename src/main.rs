use athletia_rutina::{load_catalog, load_selection, router, upstream::UpstreamClient, AppState, Config};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let catalog = load_catalog(&config.catalog_path)
        .await
        .map_err(|err| format!("failed to load catalog {}: {}", config.catalog_path.display(), err.message))?;
    let selection = load_selection(&config.data_path).await;
    info!(
        exercises = catalog.len(),
        selected = selection.len(),
        upstream = %config.upstream.base_url,
        "catalog loaded"
    );
    if config.upstream.csrf_token.is_empty() {
        warn!("ATHLETIA_CSRF_TOKEN is not set; the server will likely reject submissions");
    }

    let upstream = UpstreamClient::new(&config.upstream)?;
    let state = AppState::new(config.data_path.clone(), catalog, selection, upstream);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
