use sea_orm_migration::prelude::*;

use super::m20201123_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(comment_table()).await?;

        // Decoration lookup: newest visible comments of one post
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_post_visibility")
                    .table(Comment::Table)
                    .col(Comment::PostId)
                    .col(Comment::IsActive)
                    .col(Comment::IsPublished)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

/// `post_id` is a plain indexed column: comments outlive their post's row
/// and are never removed by the database.
fn comment_table() -> TableCreateStatement {
    Table::create()
        .table(Comment::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Comment::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Comment::UserId).big_integer().null())
        .col(ColumnDef::new(Comment::PostId).big_integer().not_null())
        .col(ColumnDef::new(Comment::Content).text().not_null())
        .col(
            ColumnDef::new(Comment::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Comment::IsPublished)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Comment::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Comment::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_comment_user")
                .from(Comment::Table, Comment::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

#[derive(Iden)]
pub enum Comment {
    Table,
    Id,
    UserId,
    PostId,
    Content,
    IsActive,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}
