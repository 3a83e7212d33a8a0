//! User input and update builder.

use serde::Serialize;

use school_core::entities::User;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<Option<String>>,
}

impl UserUpdate {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(photo_url) = self.photo_url {
            user.photo_url = photo_url;
        }
    }
}

#[derive(Default)]
pub struct UserUpdateBuilder(UserUpdate);

impl UserUpdateBuilder {
    pub fn new() -> Self {
        Self(UserUpdate::default())
    }

    pub fn first_name(mut self, val: Option<String>) -> Self {
        self.0.first_name = Some(val);
        self
    }

    pub fn last_name(mut self, val: Option<String>) -> Self {
        self.0.last_name = Some(val);
        self
    }

    pub fn email(mut self, val: impl Into<String>) -> Self {
        self.0.email = Some(val.into());
        self
    }

    pub fn photo_url(mut self, val: Option<String>) -> Self {
        self.0.photo_url = Some(val);
        self
    }

    pub fn build(self) -> UserUpdate {
        self.0
    }
}
