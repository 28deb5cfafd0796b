use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A proposed curriculum item, placed in the program by academic year and
/// semester. Courses are not voted on; they connect to career areas through
/// the association map instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    /// Academic year, 1 through 4.
    pub year: u8,
    /// Semester within the year, 1 or 2.
    pub semester: u8,
    /// Id of the professor who proposed the course. Only they may delete it.
    pub proposed_by: String,
    pub created_at: DateTime<Utc>,
}

/// Input for proposing a new course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeCourseInput {
    pub name: String,
    pub year: u8,
    pub semester: u8,
    /// Acting professor (the authenticated session identity).
    pub professor_id: String,
}
