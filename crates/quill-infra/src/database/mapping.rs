//! Binding between a domain [`Record`] and a SeaORM entity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, EntityTrait, Value};

use quill_core::query::{FieldValue, Record};

/// Describes how a SeaORM entity stores a domain record.
///
/// This is the only per-table code the generic paged repository needs:
/// a column for every domain field and the active models for insert/update.
pub trait TableMapping: EntityTrait {
    type Record: Record + From<Self::Model>;

    fn column(field: <Self::Record as Record>::Field) -> Self::Column;

    /// Active model for an insert; the primary key is left to the database.
    fn insertion(draft: <Self::Record as Record>::Draft, now: DateTime<Utc>) -> Self::ActiveModel;

    /// Active model carrying only the changed columns plus `updated_at`.
    fn changeset(
        changes: <Self::Record as Record>::Changes,
        now: DateTime<Utc>,
    ) -> Self::ActiveModel;
}

/// Convert a filter value into a SQL value.
pub(crate) fn db_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Int(v) => Value::BigInt(Some(*v)),
        FieldValue::Text(v) => v.clone().into(),
        FieldValue::Bool(v) => Value::Bool(Some(*v)),
        FieldValue::Timestamp(v) => (*v).into(),
        FieldValue::Null => Value::BigInt(None),
    }
}

/// `Set` when the change is present, `NotSet` otherwise.
pub(crate) fn set_if<T>(value: Option<T>) -> ActiveValue<T>
where
    T: Into<Value>,
{
    value.map_or(ActiveValue::NotSet, ActiveValue::Set)
}
