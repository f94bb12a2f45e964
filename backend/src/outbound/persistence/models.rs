//! Diesel row types. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{User, UserDraft, UserId, UserValidationError};

use super::schema::users;

/// Row read back from the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            name,
            email,
            created_at,
            updated_at,
        } = row;
        Ok(User::new(
            UserId::new(id)?,
            UserDraft::try_from_strings(name, email)?,
            created_at,
            updated_at,
        ))
    }
}

/// Insert payload; id and timestamps come from column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a UserDraft> for NewUserRow<'a> {
    fn from(draft: &'a UserDraft) -> Self {
        Self {
            name: draft.name().as_ref(),
            email: draft.email().as_ref(),
        }
    }
}
