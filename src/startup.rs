use crate::components::connected_accounts::{ComposioClient, ConnectedAccounts};
use crate::config::Config;
use crate::error::Error;
use crate::server::{build_router, AppState};
use crate::shutdown;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the services together and serve until a shutdown signal arrives
pub async fn start_server(config: Config) -> miette::Result<()> {
    let http = reqwest::Client::new();
    let accounts: Arc<dyn ConnectedAccounts> = Arc::new(ComposioClient::new(
        http.clone(),
        &config.composio_base_url,
        &config.composio_api_key,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::new(config, http, accounts));

    let listener = TcpListener::bind(addr).await.map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
