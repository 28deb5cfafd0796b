use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A proposed student career/specialization track.
///
/// Any professor may propose an area; every professor may cast (and retract)
/// one vote on it. Display ranking is always recomputed from vote counts, so
/// the collection itself keeps proposal order.
///
/// # Invariant
/// `votes == voted_by.len()` after every store operation. The counter is a
/// cache of the membership size and both fields are updated inside the same
/// mutation, never separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreArea {
    pub id: Uuid,
    pub name: String,
    /// Id of the professor who proposed the area. Only they may delete it.
    pub proposed_by: String,
    pub votes: u32,
    /// Professor ids that currently vote for this area, unique membership.
    pub voted_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CoreArea {
    pub fn has_vote_from(&self, professor_id: &str) -> bool {
        self.voted_by.iter().any(|id| id == professor_id)
    }
}

/// Input for proposing a new core area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeAreaInput {
    pub name: String,
    /// Acting professor (the authenticated session identity).
    pub professor_id: String,
}

/// Input for toggling a vote on a core area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteInput {
    pub professor_id: String,
}
