use meroshare_backend::config::Config;
use meroshare_backend::handlers;
use meroshare_backend::jobs::share_apply::{DailySchedule, start_share_apply_job};
use meroshare_backend::services::account_linking::AccountLinkingService;
use meroshare_backend::services::meroshare::MeroShareClient;
use meroshare_backend::services::share_apply::ShareApplyService;
use meroshare_backend::services::store_db::SeaOrmStore;
use meroshare_backend::AppState;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,meroshare_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("Failed to load configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(db.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    let store = Arc::new(SeaOrmStore::new(db.clone()));
    let meroshare = MeroShareClient::new(config.meroshare_base_url.clone(), config.meroshare_timeout)
        .expect("Failed to build MeroShare client");

    let share_apply = ShareApplyService::new(meroshare.clone(), store.clone(), store.clone());
    start_share_apply_job(
        db.clone(),
        share_apply,
        DailySchedule::new(config.share_apply_time),
        config.share_apply_on_startup,
    )
    .await;

    let state = AppState {
        accounts: store.clone(),
        shares: store.clone(),
        linking: AccountLinkingService::new(meroshare, store),
    };

    // Build router
    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| config.bind_addr.to_string())
    );

    axum::serve(listener, app).await.expect("Server error");
}
