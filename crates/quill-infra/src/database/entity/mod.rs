//! SeaORM entities for the `user`, `post` and `comment` tables.

pub mod comment;
pub mod post;
pub mod user;
