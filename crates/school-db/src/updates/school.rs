//! School input and update builder.

use serde::Serialize;

use school_core::entities::School;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSchool {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SchoolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SchoolUpdate {
    pub(crate) fn apply(self, school: &mut School) {
        if let Some(name) = self.name {
            school.name = name;
        }
    }
}

#[derive(Default)]
pub struct SchoolUpdateBuilder(SchoolUpdate);

impl SchoolUpdateBuilder {
    pub fn new() -> Self {
        Self(SchoolUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn build(self) -> SchoolUpdate {
        self.0
    }
}
