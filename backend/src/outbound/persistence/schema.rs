//! Diesel table definitions. Must match `migrations/` exactly.

diesel::table! {
    /// User records managed through the GraphQL API.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        name -> Varchar,
        /// Unique (`users_email_key`).
        email -> Varchar,
        created_at -> Timestamptz,
        /// Set explicitly by every update statement.
        updated_at -> Timestamptz,
    }
}
