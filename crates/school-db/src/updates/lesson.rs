//! Lesson input and update builder.

use serde::Serialize;

use school_core::entities::Lesson;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewLesson {
    pub name: String,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LessonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Option<String>>,
}

impl LessonUpdate {
    pub(crate) fn apply(self, lesson: &mut Lesson) {
        if let Some(name) = self.name {
            lesson.name = name;
        }
        if let Some(course_id) = self.course_id {
            lesson.course_id = course_id;
        }
    }
}

#[derive(Default)]
pub struct LessonUpdateBuilder(LessonUpdate);

impl LessonUpdateBuilder {
    pub fn new() -> Self {
        Self(LessonUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn course_id(mut self, val: Option<String>) -> Self {
        self.0.course_id = Some(val);
        self
    }

    pub fn build(self) -> LessonUpdate {
        self.0
    }
}
