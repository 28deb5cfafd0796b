//! Curriculum Board: a shared planning board where a fixed roster of
//! professors proposes career areas and courses, votes on areas, and marks
//! which courses support which areas. An external text-generation model can
//! summarize the result.
//!
//! The [`store`] module owns all three collections and every mutation; the
//! [`api`] module is thin JSON glue over it; [`analysis`] is the only
//! asynchronous collaborator and is fully decoupled from the store apart from
//! reading a snapshot.

pub mod analysis;
pub mod api;
pub mod models;
pub mod store;
