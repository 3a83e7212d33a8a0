//! User repository. Email addresses are unique across all users.

use chrono::{DateTime, Utc};

use school_core::entities::User;
use school_core::enums::EntityType;
use school_core::ids::PREFIX_USER;

use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::user::{NewUser, UserUpdate};

impl Record for User {
    const ENTITY: EntityType = EntityType::User;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "email",
        "photo_url",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            first_name: get_opt_string(row, 1)?,
            last_name: get_opt_string(row, 2)?,
            email: row.get::<String>(3)?,
            photo_url: get_opt_string(row, 4)?,
            created_at: parse_datetime(&row.get::<String>(5)?)?,
            updated_at: parse_datetime(&row.get::<String>(6)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.first_name.as_deref().into(),
            self.last_name.as_deref().into(),
            self.email.as_str().into(),
            self.photo_url.as_deref().into(),
            self.created_at.to_rfc3339().into(),
            self.updated_at.to_rfc3339().into(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl SchoolService {
    pub async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        let user = User {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            photo_url: new.photo_url,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &user).await
            })
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users: Vec<User> =
            store::find_all(self.db().conn(), &Query::new().eq("email", email).limit(1)).await?;
        Ok(users.into_iter().next())
    }

    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut user: User = store::find(conn, user_id).await?;
                update.apply(&mut user);
                user.touch(Utc::now());
                update_validated(conn, &user).await?;
                Ok(user)
            })
            .await
    }

    /// Delete a user. Their enrollment and teaching rows are left in place.
    pub async fn delete_user(&self, user_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::User, user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().order_by("last_name").order_by("first_name").order_by("email"),
        )
        .await
    }
}
