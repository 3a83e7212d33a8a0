//! Repository modules implementing CRUD operations for every curriculum entity.
//!
//! Each module implements `Record` for its entity and adds methods to
//! `SchoolService` via `impl SchoolService` blocks.

pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod lesson_assignment;
pub mod reading;
pub mod school;
pub mod term;
pub mod user;
