//! Post entity for SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use quill_core::domain::{Lifecycle, NewPost, PostChanges, PostField, Slug};

use crate::database::mapping::{TableMapping, set_if};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub content: String,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            lifecycle: Lifecycle::from_active(model.is_active),
            published: model.is_published,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl TableMapping for Entity {
    type Record = quill_core::domain::Post;

    fn column(field: PostField) -> Column {
        match field {
            PostField::Id => Column::Id,
            PostField::UserId => Column::UserId,
            PostField::Title => Column::Title,
            PostField::Slug => Column::Slug,
            PostField::Content => Column::Content,
            PostField::Lifecycle => Column::IsActive,
            PostField::Published => Column::IsPublished,
            PostField::CreatedAt => Column::CreatedAt,
            PostField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn insertion(draft: NewPost, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(draft.user_id),
            title: Set(draft.title),
            slug: Set(draft.slug.into_inner()),
            content: Set(draft.content),
            is_active: Set(true),
            is_published: Set(draft.published),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }

    fn changeset(changes: PostChanges, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            title: set_if(changes.title),
            slug: set_if(changes.slug.map(Slug::into_inner)),
            content: set_if(changes.content),
            is_published: set_if(changes.published),
            is_active: set_if(changes.lifecycle.map(Lifecycle::is_active)),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    }
}
