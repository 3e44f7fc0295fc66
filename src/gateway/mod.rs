pub mod client;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(config: &AppConfig) {
    let state = Arc::new(AppState::new(config));

    // ==========================================================================
    // Session routes: one route per allocation operator
    // ==========================================================================
    let session_routes = Router::new()
        .route(
            "/items/{item_id}/toggle/{user_id}",
            post(handlers::session::toggle_share),
        )
        .route(
            "/items/{item_id}/shares/{user_id}",
            put(handlers::session::update_share),
        )
        .route(
            "/items/{item_id}/distribute",
            post(handlers::session::distribute_item),
        )
        .route(
            "/items/{item_id}/balance",
            post(handlers::session::balance_item),
        )
        .route("/assign-all/{user_id}", post(handlers::session::assign_all))
        .route("/split-all", post(handlers::session::split_all))
        .route("/payer", put(handlers::session::set_payer))
        .route("/description", put(handlers::session::set_description))
        .route("/group", put(handlers::session::set_group));

    // ==========================================================================
    // Complete router
    // ==========================================================================
    let app = Router::new()
        .route("/api/v1/health", get(handlers::health::health_check))
        .route(
            "/api/v1/receipts/analyze",
            post(handlers::receipts::analyze_receipts),
        )
        .route("/api/v1/groups", get(handlers::groups::list_groups))
        .route("/api/v1/expenses", post(handlers::expenses::create_expense))
        .route(
            "/api/v1/session",
            get(handlers::session::get_session).delete(handlers::session::reset_session),
        )
        .nest("/api/v1/session", session_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    // Bind address
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                config.gateway.port, config.gateway.port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("🧾 Upstream split API: {}", config.upstream.base_url);

    // Start server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
