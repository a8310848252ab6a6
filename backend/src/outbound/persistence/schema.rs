//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Application users.
    users (id) {
        id -> Int8,
        name -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sheet music entries, optionally owned by a user.
    ///
    /// `user_id` references `users (id) ON DELETE CASCADE`.
    scores (id) {
        id -> Int8,
        user_id -> Nullable<Int8>,
        name -> Nullable<Varchar>,
        composer -> Nullable<Varchar>,
        arranger -> Nullable<Varchar>,
        grade -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(scores -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, scores);
