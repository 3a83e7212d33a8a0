//! Course input and update builder.

use serde::Serialize;

use school_core::entities::Course;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub course_code: String,
    pub term_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_id: Option<Option<String>>,
}

impl CourseUpdate {
    pub(crate) fn apply(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(course_code) = self.course_code {
            course.course_code = course_code;
        }
        if let Some(term_id) = self.term_id {
            course.term_id = term_id;
        }
    }
}

#[derive(Default)]
pub struct CourseUpdateBuilder(CourseUpdate);

impl CourseUpdateBuilder {
    pub fn new() -> Self {
        Self(CourseUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn course_code(mut self, val: impl Into<String>) -> Self {
        self.0.course_code = Some(val.into());
        self
    }

    pub fn term_id(mut self, val: Option<String>) -> Self {
        self.0.term_id = Some(val);
        self
    }

    pub fn build(self) -> CourseUpdate {
        self.0
    }
}
