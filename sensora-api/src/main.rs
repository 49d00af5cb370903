use std::net::SocketAddr;
use std::sync::Arc;

use sensora_api::{app, AdminRegistry, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensora_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sensora_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Sensora API on port {}", config.server.port);

    let db = sensora_store::DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let catalog = Arc::new(sensora_store::PgCatalogStore::new(db.pool.clone()));
    let carts = Arc::new(sensora_store::PgCartStore::new(db.pool.clone()));

    let state = AppState {
        reference: catalog.clone(),
        products: catalog,
        customers: carts.clone(),
        carts,
        admin: Arc::new(AdminRegistry::standard()),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
