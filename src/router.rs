use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Config build routes
        .route("/api/configs/:kind", post(handlers::configs::build_config))
        // Template routes
        .route("/api/templates", get(handlers::templates::list_templates))
        .route("/api/templates/:name/placeholders", get(handlers::templates::get_template_placeholders))
        // Backup-system snippet routes
        .route("/api/oxidized/templates", get(handlers::templates::list_oxidized_templates))
        .route("/api/oxidized/placeholders/:name", get(handlers::templates::get_oxidized_placeholders))
        .route("/api/oxidized/generate", post(handlers::templates::generate_bundle))
        // Inventory routes
        .route("/api/inventory/insert", post(handlers::inventory::insert_line))
        .route("/api/inventory/groups", post(handlers::inventory::list_groups))
        // Address table
        .route("/api/ip-table", get(handlers::ip_table::get_ip_table))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
