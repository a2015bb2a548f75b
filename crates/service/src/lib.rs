//! Service layer providing the resource operations on top of models.
//! - Query functions return plain records and joined views.
//! - Cascading deletes are explicit, transactional functions per entity.
//! - Referential and uniqueness rules are checked here before the store
//!   enforces them again.

pub mod errors;
pub mod cascade;
pub mod student_service;
pub mod instructor_service;
pub mod course_service;
pub mod enrollment_service;
#[cfg(test)]
pub mod test_support;

pub use cascade::CascadeReport;
pub use errors::ServiceError;
