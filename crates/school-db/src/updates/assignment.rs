//! Assignment input and update builder.

use serde::Serialize;

use school_core::entities::Assignment;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAssignment {
    pub name: String,
    pub course_id: Option<String>,
    pub percent_of_grade: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_of_grade: Option<Option<f64>>,
}

impl AssignmentUpdate {
    pub(crate) fn apply(self, assignment: &mut Assignment) {
        if let Some(name) = self.name {
            assignment.name = name;
        }
        if let Some(course_id) = self.course_id {
            assignment.course_id = course_id;
        }
        if let Some(percent_of_grade) = self.percent_of_grade {
            assignment.percent_of_grade = percent_of_grade;
        }
    }
}

#[derive(Default)]
pub struct AssignmentUpdateBuilder(AssignmentUpdate);

impl AssignmentUpdateBuilder {
    pub fn new() -> Self {
        Self(AssignmentUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn course_id(mut self, val: Option<String>) -> Self {
        self.0.course_id = Some(val);
        self
    }

    pub fn percent_of_grade(mut self, val: Option<f64>) -> Self {
        self.0.percent_of_grade = Some(val);
        self
    }

    pub fn build(self) -> AssignmentUpdate {
        self.0
    }
}
