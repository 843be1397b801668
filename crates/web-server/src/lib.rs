use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::DbRepository;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod views;

/// The shared application state that all handlers can access.
///
/// The repository owns the connection pool; it is the only state shared
/// between requests.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Builds the router with every page route and the request trace layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", post(handlers::add_student))
        .route("/delete", post(handlers::delete_student))
        .route("/edit/:id", get(handlers::edit_page))
        .route("/edit", post(handlers::update_student))
        .route("/health", get(|| async { "OK" }))
        .with_state(Arc::new(state))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Connects to the database and serves HTTP until Ctrl-C.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&db_pool).await?;
    }
    let db_repo = DbRepository::new(db_pool);

    let app = app(AppState { db_repo });

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}
