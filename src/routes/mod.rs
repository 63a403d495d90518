//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `TASKBOARD_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - Task CRUD routes under `/api`

pub mod doc;
mod health;
mod tasks;

use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .nest("/api", tasks::router());

    let mut app = Router::new().merge(api_router);

    // ── Swagger UI ────────────────────────────────────────────────────────────
    // Enabled by default; disable with TASKBOARD_ENABLE_SWAGGER=false in
    // production to avoid exposing the API structure to potential attackers.
    if state.config.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()),
        );
    }

    app
        // Each `.layer` wraps the stack built so far, so the trace layer
        // added last is outermost and sees every request first.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
