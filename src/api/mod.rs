mod auth;
mod handlers;

pub use auth::AuthConfig;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analysis::AnalysisService;
use crate::models::Roster;
use crate::store::Store;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub roster: Arc<Roster>,
    pub auth: AuthConfig,
    pub analysis: AnalysisService,
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Roster & login
        .route("/roster", get(handlers::get_roster))
        .route("/login", post(handlers::login))
        // Core areas
        .route("/areas", get(handlers::list_areas))
        .route("/areas", post(handlers::propose_area))
        .route("/areas/{id}/vote", post(handlers::toggle_vote))
        .route("/areas/{id}", delete(handlers::delete_area))
        // Courses
        .route("/courses", get(handlers::list_courses))
        .route("/courses", post(handlers::propose_course))
        .route("/courses/{id}", delete(handlers::delete_course))
        // Associations
        .route("/associations", get(handlers::get_associations))
        .route("/associations/matrix", get(handlers::get_association_matrix))
        .route("/associations/toggle", post(handlers::toggle_association))
        // Analysis
        .route("/analysis", post(handlers::run_analysis))
        .route("/analysis/latest", get(handlers::latest_analysis))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
