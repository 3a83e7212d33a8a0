//! Entity structs for every curriculum record.
//!
//! Each entity maps to one table in the libSQL database (see
//! `school-db/migrations/001_initial.sql`). Required string fields are plain
//! `String`s where the empty string means "absent"; validation rejects it.

mod assignment;
mod course;
mod enrollment;
mod lesson;
mod reading;
mod school;
mod term;
mod user;

pub use assignment::Assignment;
pub use course::Course;
pub use enrollment::{CourseInstructor, CourseStudent, LessonAssignment};
pub use lesson::Lesson;
pub use reading::{Reading, ReadingForm};
pub use school::School;
pub use term::Term;
pub use user::User;
