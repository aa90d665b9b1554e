use std::env;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod error;
mod middleware;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = AppState {
        supabase_url: env::var("LABWISE_SUPABASE_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string()),
        supabase_anon_key: env::var("LABWISE_SUPABASE_ANON_KEY").unwrap_or_default(),
        openai_url: env::var("LABWISE_OPENAI_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        openai_key: env::var("LABWISE_OPENAI_KEY").unwrap_or_default(),
        openai_model: env::var("LABWISE_OPENAI_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/reports", post(routes::reports::create_report))
        .route("/reports", get(routes::reports::list_reports))
        .route("/reports/{id}", get(routes::reports::get_report))
        .route(
            "/reports/{id}/interpretation",
            post(routes::interpret::interpret_report),
        )
        .route("/reports/{id}/export", post(routes::export::export_report))
        .layer(axum_mw::from_fn(middleware::auth::require_auth));

    let app = Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(cors)
        .with_state(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
