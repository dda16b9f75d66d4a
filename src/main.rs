//! Market Status Backend Server
//!
//! REST and WebSocket server exposing hierarchical status containers and
//! the warning log.

use anyhow::Context;
use market_status_backend::api::create_router;
use market_status_backend::config::Config;
use market_status_backend::db::DatabasePool;
use market_status_backend::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use market_status_backend::models::{
    ClearStatusResponse, HealthResponse, StatusUpdateRequest, StatusUpdateResponse, UpdateType,
};
use market_status_backend::warning::{NewWarning, Warning};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        market_status_backend::api::handlers::health_check,
        market_status_backend::api::handlers::get_status,
        market_status_backend::api::handlers::update_status,
        market_status_backend::api::handlers::clear_status,
        market_status_backend::api::handlers::list_warnings,
        market_status_backend::api::handlers::get_warning,
        market_status_backend::api::handlers::create_warning,
        market_status_backend::api::websocket::status_ws_handler,
        market_status_backend::api::websocket::warning_ws_handler,
    ),
    components(
        schemas(
            HealthResponse,
            UpdateType,
            StatusUpdateRequest,
            StatusUpdateResponse,
            ClearStatusResponse,
            NewWarning,
            Warning,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Status", description = "Hierarchical status containers"),
        (name = "Warnings", description = "Warning log"),
        (name = "WebSocket", description = "Change and warning streams"),
    ),
    info(
        title = "Market Status API",
        version = "0.1.0",
        description = "REST API for status containers and warnings",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path))?
        .with_env_overrides()?;

    let db = match config.database.url.as_deref() {
        Some(url) => {
            let db = DatabasePool::new(url).await.context("connecting to database")?;
            db.ensure_schema().await.context("creating warning table")?;
            Some(db)
        }
        None => {
            info!("No database configured, warnings are kept in memory only");
            None
        }
    };

    let state = Arc::new(AppState::from_config(config.clone(), db.clone()));

    if let Some(db) = &db {
        match db.load_warnings().await {
            Ok(warnings) => {
                info!("Restored {} warnings", warnings.len());
                state.warnings.restore(warnings);
            }
            Err(e) => warn!("Failed to restore warnings: {}", e),
        }
    }

    let host = config.server.host;
    let port = config.server.port;

    info!("Starting Market Status Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
