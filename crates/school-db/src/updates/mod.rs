//! Input and update types for entity mutations.
//!
//! `NewX` structs carry the fields a caller supplies on create; identity and
//! timestamps are assigned by the repository. Each `XUpdate` has `Option`
//! fields, and only `Some` fields change the stored record. The updated record
//! goes back through the same validation gate as a create.

pub mod assignment;
pub mod course;
pub mod lesson;
pub mod reading;
pub mod school;
pub mod term;
pub mod user;
