//! Pointcast panel server binary

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointcast_backend::{config, create_app, AppState};
use pointcast_backend::external::MeteomaticsClient;
use pointcast_backend::services::panel::PanelService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointcast_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Pointcast panel server");
    tracing::info!("Environment: {}", config.environment);

    let provider = Arc::new(MeteomaticsClient::new(
        config.provider.base_url.clone(),
        config.provider.username.clone(),
        config.provider.password.clone(),
    ));
    let panel = PanelService::new(provider, config.panel.clone(), config.alerts.clone());

    let state = AppState {
        config: Arc::new(config.clone()),
        panel,
    };

    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
