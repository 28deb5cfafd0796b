use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sparse course↔area endorsement map.
///
/// Outer key = course id, inner key = area id, value = professor ids that
/// endorse the pairing, unique membership. An absent cell and an empty cell
/// mean the same thing ("no endorsement"); un-endorsing may leave an empty
/// vector behind and queries must not care.
pub type AssociationMap = HashMap<Uuid, HashMap<Uuid, Vec<String>>>;

/// Professor-anonymous view of [`AssociationMap`]: a cell is `true` iff at
/// least one professor endorses the pairing. Always derived fresh for the
/// analysis request, never stored.
pub type BooleanAssociationMap = HashMap<Uuid, HashMap<Uuid, bool>>;

/// Input for toggling one professor's endorsement of a (course, area) pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleAssociationInput {
    pub course_id: Uuid,
    pub area_id: Uuid,
    /// Acting professor (the authenticated session identity).
    pub professor_id: String,
}

/// One association cell as returned after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationCell {
    pub course_id: Uuid,
    pub area_id: Uuid,
    pub endorsed_by: Vec<String>,
}
