//! HTTP surface: presentation CRUD endpoints, the reaction counter endpoint,
//! health checks, and the WebSocket connection server.

pub mod error;
pub mod health;
pub mod presentation;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use livereact_core::{
    config::WebSocketConfig, CounterStore, ReactionHub, ReactionRouter,
};

pub use error::{AppError, AppResult};

/// Shared application state for all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<ReactionHub>,
    pub store: Arc<dyn CounterStore>,
    pub router: ReactionRouter,
    pub websocket: WebSocketConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        hub: Arc<ReactionHub>,
        store: Arc<dyn CounterStore>,
        websocket: WebSocketConfig,
    ) -> Self {
        let router = ReactionRouter::new(hub.clone(), store.clone());
        Self {
            hub,
            store,
            router,
            websocket,
        }
    }
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::create_health_router())
        // Presentation record routes
        .route("/api/presentations", post(presentation::create_presentation))
        .route(
            "/api/presentations/{presentation_id}",
            get(presentation::get_presentation),
        )
        .route(
            "/api/presentations/{presentation_id}/reactions",
            post(presentation::add_reaction),
        )
        // Live reaction channel
        .route(
            "/ws/presentations/{presentation_id}",
            get(websocket::websocket_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
