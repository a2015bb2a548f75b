//! Entities of the course-tracking store and their field-level rules.
//!
//! Each entity module owns its sea-orm definition, the typed create / patch
//! inputs, and the `create` / `update` functions that validate before touching
//! the database.

pub mod errors;
pub mod db;
pub mod validation;
pub mod instructor;
pub mod student;
pub mod course;
pub mod enrollment;

#[cfg(test)]
mod tests;
