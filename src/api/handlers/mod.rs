use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::{AnalysisOutcome, AnalysisResult, Snapshot};
use crate::api::AppState;
use crate::models::*;
use crate::store::StoreError;

// ============================================================
// Error Handling
// ============================================================

/// Map a store rejection to an HTTP status.
///
/// Rejections are expected outcomes, not faults: the UI normally hides the
/// offending control, and the store re-checks defensively. The message text
/// is safe to show to the client as-is.
fn store_error(e: StoreError) -> (StatusCode, String) {
    let status = match e {
        StoreError::EmptyName | StoreError::InvalidTerm => StatusCode::BAD_REQUEST,
        StoreError::NotProposer => StatusCode::FORBIDDEN,
        StoreError::AreaNotFound | StoreError::CourseNotFound => StatusCode::NOT_FOUND,
    };
    tracing::warn!("Rejected store operation: {}", e);
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Roster & Login
// ============================================================

pub async fn get_roster(State(state): State<AppState>) -> Json<Vec<Professor>> {
    Json(state.roster.professors.clone())
}

/// Login request: pick a roster identity with the shared password.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub professor_id: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Professor>, (StatusCode, String)> {
    if !state.auth.verify(&input.password) {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Incorrect password".to_string(),
        ));
    }

    state
        .roster
        .get(&input.professor_id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Unknown professor".to_string()))
}

// ============================================================
// Core Areas
// ============================================================

/// Acting professor for delete requests, where there is no body.
#[derive(Debug, Deserialize)]
pub struct ActingProfessor {
    pub professor_id: String,
}

pub async fn list_areas(State(state): State<AppState>) -> Json<Vec<CoreArea>> {
    Json(state.store.ranked_areas())
}

pub async fn propose_area(
    State(state): State<AppState>,
    Json(input): Json<ProposeAreaInput>,
) -> Result<(StatusCode, Json<CoreArea>), (StatusCode, String)> {
    state
        .store
        .propose_area(input)
        .map(|a| (StatusCode::CREATED, Json(a)))
        .map_err(store_error)
}

pub async fn toggle_vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<VoteInput>,
) -> Result<Json<CoreArea>, (StatusCode, String)> {
    state
        .store
        .toggle_vote(id, &input.professor_id)
        .map(Json)
        .map_err(store_error)
}

pub async fn delete_area(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActingProfessor>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .delete_area(id, &query.professor_id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(store_error)
}

// ============================================================
// Courses
// ============================================================

pub async fn list_courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    Json(state.store.sorted_courses())
}

pub async fn propose_course(
    State(state): State<AppState>,
    Json(input): Json<ProposeCourseInput>,
) -> Result<(StatusCode, Json<Course>), (StatusCode, String)> {
    state
        .store
        .propose_course(input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(store_error)
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActingProfessor>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .delete_course(id, &query.professor_id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(store_error)
}

// ============================================================
// Associations
// ============================================================

pub async fn get_associations(State(state): State<AppState>) -> Json<AssociationMap> {
    Json(state.store.associations())
}

pub async fn get_association_matrix(State(state): State<AppState>) -> Json<BooleanAssociationMap> {
    Json(state.store.boolean_view())
}

pub async fn toggle_association(
    State(state): State<AppState>,
    Json(input): Json<ToggleAssociationInput>,
) -> Result<Json<AssociationCell>, (StatusCode, String)> {
    state
        .store
        .toggle_association(input)
        .map(Json)
        .map_err(store_error)
}

// ============================================================
// Analysis
// ============================================================

/// Run the curriculum analysis against the external model.
///
/// The snapshot is taken up front; mutations stay fully available while the
/// request is in flight. Never fails: any upstream problem comes back as the
/// fixed fallback text.
pub async fn run_analysis(State(state): State<AppState>) -> Json<AnalysisOutcome> {
    let snapshot = Snapshot::capture(&state.store);
    Json(state.analysis.analyze(snapshot).await)
}

pub async fn latest_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, (StatusCode, String)> {
    state.analysis.latest().map(Json).ok_or((
        StatusCode::NOT_FOUND,
        "No analysis has completed yet".to_string(),
    ))
}
