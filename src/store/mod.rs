mod storage;

pub use storage::{JsonFileStorage, MemoryStorage, Slot, StorageBackend};

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// Why a store operation was rejected.
///
/// Every rejection leaves the collections untouched. Authorization is checked
/// here, not just hidden in the caller's UI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Year must be 1-4 and semester 1-2")]
    InvalidTerm,

    #[error("Core area not found")]
    AreaNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Only the proposer may delete this entry")]
    NotProposer,
}

struct Inner {
    areas: Vec<CoreArea>,
    courses: Vec<Course>,
    associations: AssociationMap,
    storage: Box<dyn StorageBackend>,
}

/// The curriculum store: core areas, courses and their associations, mirrored
/// to the injected [`StorageBackend`] after every mutation.
///
/// All operations run inside one mutex, so a cascade delete is atomic with
/// respect to every observer: a course is never visible as deleted while its
/// association row still exists. The acting professor id is always a caller
/// parameter; the store trusts the authenticated session identity it is given
/// and does not consult the roster.
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl Store {
    /// Open the store, reading all three collections from storage.
    ///
    /// A missing or unparseable blob yields an empty collection for that slot
    /// and a warning; startup never fails on bad persisted state.
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        let areas = load_slot(storage.as_ref(), Slot::Areas);
        let courses = load_slot(storage.as_ref(), Slot::Courses);
        let associations = load_slot(storage.as_ref(), Slot::Associations);

        Self {
            inner: Arc::new(Mutex::new(Inner {
                areas,
                courses,
                associations,
                storage,
            })),
        }
    }

    // ============================================================
    // Core area operations
    // ============================================================

    pub fn propose_area(&self, input: ProposeAreaInput) -> Result<CoreArea, StoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let area = CoreArea {
            id: Uuid::new_v4(),
            name: name.to_string(),
            proposed_by: input.professor_id,
            votes: 0,
            voted_by: Vec::new(),
            created_at: Utc::now(),
        };

        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.areas.push(area.clone());
        persist(&*inner, Slot::Areas, &inner.areas);
        Ok(area)
    }

    /// Toggle one professor's vote on an area.
    ///
    /// The cached `votes` counter and the `voted_by` membership change inside
    /// the same critical section, so `votes == voted_by.len()` holds at every
    /// observable point. Two consecutive toggles by the same professor restore
    /// the prior state exactly.
    pub fn toggle_vote(&self, area_id: Uuid, professor_id: &str) -> Result<CoreArea, StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let area = inner
            .areas
            .iter_mut()
            .find(|a| a.id == area_id)
            .ok_or(StoreError::AreaNotFound)?;

        if area.has_vote_from(professor_id) {
            area.voted_by.retain(|id| id != professor_id);
        } else {
            area.voted_by.push(professor_id.to_string());
        }
        area.votes = area.voted_by.len() as u32;

        let updated = area.clone();
        persist(&*inner, Slot::Areas, &inner.areas);
        Ok(updated)
    }

    /// Delete an area and strip its column from every association row.
    pub fn delete_area(&self, area_id: Uuid, requester_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let area = inner
            .areas
            .iter()
            .find(|a| a.id == area_id)
            .ok_or(StoreError::AreaNotFound)?;
        if area.proposed_by != requester_id {
            return Err(StoreError::NotProposer);
        }

        inner.areas.retain(|a| a.id != area_id);
        for row in inner.associations.values_mut() {
            row.remove(&area_id);
        }

        persist(&*inner, Slot::Areas, &inner.areas);
        persist(&*inner, Slot::Associations, &inner.associations);
        Ok(())
    }

    /// Areas in display order: vote count descending, proposal order as the
    /// stable tiebreak.
    pub fn ranked_areas(&self) -> Vec<CoreArea> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut areas = inner.areas.clone();
        areas.sort_by(|a, b| b.votes.cmp(&a.votes));
        areas
    }

    // ============================================================
    // Course operations
    // ============================================================

    pub fn propose_course(&self, input: ProposeCourseInput) -> Result<Course, StoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if !(1..=4).contains(&input.year) || !(1..=2).contains(&input.semester) {
            return Err(StoreError::InvalidTerm);
        }

        let course = Course {
            id: Uuid::new_v4(),
            name: name.to_string(),
            year: input.year,
            semester: input.semester,
            proposed_by: input.professor_id,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.courses.push(course.clone());
        persist(&*inner, Slot::Courses, &inner.courses);
        Ok(course)
    }

    /// Delete a course and its entire association row.
    pub fn delete_course(&self, course_id: Uuid, requester_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let course = inner
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .ok_or(StoreError::CourseNotFound)?;
        if course.proposed_by != requester_id {
            return Err(StoreError::NotProposer);
        }

        inner.courses.retain(|c| c.id != course_id);
        inner.associations.remove(&course_id);

        persist(&*inner, Slot::Courses, &inner.courses);
        persist(&*inner, Slot::Associations, &inner.associations);
        Ok(())
    }

    /// Courses in display order: `(year, semester)` ascending, proposal order
    /// as the stable tiebreak. Course name is ignored for ordering.
    pub fn sorted_courses(&self) -> Vec<Course> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut courses = inner.courses.clone();
        courses.sort_by_key(|c| (c.year, c.semester));
        courses
    }

    // ============================================================
    // Association operations
    // ============================================================

    /// Toggle one professor's endorsement of a (course, area) pairing.
    ///
    /// Self-inverse: toggling twice with the same arguments restores the
    /// prior endorsement set exactly. Un-endorsing may leave an empty cell
    /// behind; queries treat that the same as an absent cell.
    pub fn toggle_association(
        &self,
        input: ToggleAssociationInput,
    ) -> Result<AssociationCell, StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        if !inner.courses.iter().any(|c| c.id == input.course_id) {
            return Err(StoreError::CourseNotFound);
        }
        if !inner.areas.iter().any(|a| a.id == input.area_id) {
            return Err(StoreError::AreaNotFound);
        }

        let cell = inner
            .associations
            .entry(input.course_id)
            .or_default()
            .entry(input.area_id)
            .or_default();

        if cell.iter().any(|id| *id == input.professor_id) {
            cell.retain(|id| *id != input.professor_id);
        } else {
            cell.push(input.professor_id);
        }
        let endorsed_by = cell.clone();

        persist(&*inner, Slot::Associations, &inner.associations);
        Ok(AssociationCell {
            course_id: input.course_id,
            area_id: input.area_id,
            endorsed_by,
        })
    }

    /// Number of professors endorsing the pairing; 0 when the cell is absent.
    /// Tolerates ids that no longer (or never did) exist.
    pub fn endorsement_count(&self, course_id: Uuid, area_id: Uuid) -> usize {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .associations
            .get(&course_id)
            .and_then(|row| row.get(&area_id))
            .map_or(0, |cell| cell.len())
    }

    pub fn is_endorsed_by(&self, course_id: Uuid, area_id: Uuid, professor_id: &str) -> bool {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .associations
            .get(&course_id)
            .and_then(|row| row.get(&area_id))
            .is_some_and(|cell| cell.iter().any(|id| id == professor_id))
    }

    pub fn associations(&self) -> AssociationMap {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.associations.clone()
    }

    /// Collapse the association map to "endorsed by at least one professor".
    ///
    /// Derived fresh on every call; a cell is `true` iff its endorsement
    /// count is positive. Empty cells left behind by un-endorsement collapse
    /// to `false`.
    pub fn boolean_view(&self) -> BooleanAssociationMap {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .associations
            .iter()
            .map(|(course_id, row)| {
                let row = row
                    .iter()
                    .map(|(area_id, cell)| (*area_id, !cell.is_empty()))
                    .collect();
                (*course_id, row)
            })
            .collect()
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

fn load_slot<T: DeserializeOwned + Default>(storage: &dyn StorageBackend, slot: Slot) -> T {
    let Some(raw) = storage.load(slot) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Discarding unparseable {:?} blob: {}", slot, e);
            T::default()
        }
    }
}

/// Rewrite one slot in full. A write failure is logged and otherwise ignored;
/// the in-memory state stays authoritative for the rest of the session.
fn persist<T: Serialize>(inner: &Inner, slot: Slot, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize {:?}: {}", slot, e);
            return;
        }
    };
    if let Err(e) = inner.storage.save(slot, &json) {
        tracing::warn!("Failed to persist {:?}: {}", slot, e);
    }
}
