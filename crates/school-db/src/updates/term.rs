//! Term input and update builder.

use chrono::NaiveDate;
use serde::Serialize;

use school_core::entities::Term;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTerm {
    pub name: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub school_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TermUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Option<String>>,
}

impl TermUpdate {
    pub(crate) fn apply(self, term: &mut Term) {
        if let Some(name) = self.name {
            term.name = name;
        }
        if let Some(starts_on) = self.starts_on {
            term.starts_on = starts_on;
        }
        if let Some(ends_on) = self.ends_on {
            term.ends_on = ends_on;
        }
        if let Some(school_id) = self.school_id {
            term.school_id = school_id;
        }
    }
}

#[derive(Default)]
pub struct TermUpdateBuilder(TermUpdate);

impl TermUpdateBuilder {
    pub fn new() -> Self {
        Self(TermUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn starts_on(mut self, val: Option<NaiveDate>) -> Self {
        self.0.starts_on = Some(val);
        self
    }

    pub fn ends_on(mut self, val: Option<NaiveDate>) -> Self {
        self.0.ends_on = Some(val);
        self
    }

    pub fn school_id(mut self, val: Option<String>) -> Self {
        self.0.school_id = Some(val);
        self
    }

    pub fn build(self) -> TermUpdate {
        self.0
    }
}
