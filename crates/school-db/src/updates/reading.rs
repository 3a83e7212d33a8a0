//! Reading update builder.
//!
//! Readings are created from a `ReadingForm`; updates patch the same editable
//! text fields and are re-parsed through the form.

use serde::Serialize;

use school_core::entities::ReadingForm;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ReadingUpdate {
    pub(crate) fn apply(self, form: &mut ReadingForm) {
        if let Some(caption) = self.caption {
            form.caption = caption;
        }
        if let Some(order_number) = self.order_number {
            form.order_number = order_number;
        }
        if let Some(lesson_id) = self.lesson_id {
            form.lesson_id = lesson_id;
        }
        if let Some(url) = self.url {
            form.url = url;
        }
    }
}

#[derive(Default)]
pub struct ReadingUpdateBuilder(ReadingUpdate);

impl ReadingUpdateBuilder {
    pub fn new() -> Self {
        Self(ReadingUpdate::default())
    }

    pub fn caption(mut self, val: Option<String>) -> Self {
        self.0.caption = Some(val);
        self
    }

    pub fn order_number(mut self, val: impl Into<String>) -> Self {
        self.0.order_number = Some(val.into());
        self
    }

    pub fn lesson_id(mut self, val: impl Into<String>) -> Self {
        self.0.lesson_id = Some(val.into());
        self
    }

    pub fn url(mut self, val: impl Into<String>) -> Self {
        self.0.url = Some(val.into());
        self
    }

    pub fn build(self) -> ReadingUpdate {
        self.0
    }
}
