//! Schema migrations for the Quill blog database.

pub use sea_orm_migration::prelude::*;

mod m20201123_000001_create_user_table;
mod m20201123_000002_create_post_table;
mod m20201123_000003_create_comment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20201123_000001_create_user_table::Migration),
            Box::new(m20201123_000002_create_post_table::Migration),
            Box::new(m20201123_000003_create_comment_table::Migration),
        ]
    }
}
