//! Domain models for the curriculum board.
//!
//! # Core Concepts
//!
//! ## Fixed Entities
//!
//! - [`Professor`]: A member of the department roster. The roster is supplied
//!   at startup and never changes while the board is running.
//!
//! ## Proposed Entities
//!
//! These are created and deleted by professors through the store:
//!
//! - [`CoreArea`]: A student career/specialization track, subject to peer
//!   voting. Display order is always vote count, descending.
//! - [`Course`]: A curriculum item tagged with academic year and semester.
//!   Display order is `(year, semester)`, ascending.
//!
//! ## Associations
//!
//! [`AssociationMap`] records, per `(course, area)` pairing, which professors
//! endorse linking that course to that career area. The professor-anonymous
//! [`BooleanAssociationMap`] is derived from it for analysis requests and is
//! never stored.

mod area;
mod association;
mod course;
mod professor;

pub use area::*;
pub use association::*;
pub use course::*;
pub use professor::*;
