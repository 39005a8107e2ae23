//! Comment entity for SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use quill_core::domain::{CommentChanges, CommentField, Lifecycle, NewComment};

use crate::database::mapping::{TableMapping, set_if};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub post_id: i64,
    pub content: String,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for quill_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            post_id: model.post_id,
            content: model.content,
            lifecycle: Lifecycle::from_active(model.is_active),
            published: model.is_published,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl TableMapping for Entity {
    type Record = quill_core::domain::Comment;

    fn column(field: CommentField) -> Column {
        match field {
            CommentField::Id => Column::Id,
            CommentField::UserId => Column::UserId,
            CommentField::PostId => Column::PostId,
            CommentField::Content => Column::Content,
            CommentField::Lifecycle => Column::IsActive,
            CommentField::Published => Column::IsPublished,
            CommentField::CreatedAt => Column::CreatedAt,
            CommentField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn insertion(draft: NewComment, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(draft.user_id),
            post_id: Set(draft.post_id),
            content: Set(draft.content),
            is_active: Set(true),
            is_published: Set(draft.published),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }

    fn changeset(changes: CommentChanges, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            content: set_if(changes.content),
            is_published: set_if(changes.published),
            is_active: set_if(changes.lifecycle.map(Lifecycle::is_active)),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    }
}
