use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, IdenStatic,
    IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};

use quill_core::error::RepoError;
use quill_core::ports::PagedRepository;
use quill_core::query::{Direction, FieldValue, Filter, FindOptions, Record};

use super::mapping::{TableMapping, db_value};

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub(crate) fn table(&self) -> String {
        E::default().as_str().to_owned()
    }
}

/// Map a SeaORM error onto the repository error taxonomy.
pub(crate) fn repo_error(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepoError::Constraint(detail);
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

fn order(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    }
}

/// Turn an exact-match filter into `WHERE col = $n AND ...`.
fn apply_filter<E>(mut select: Select<E>, filter: &Filter<<E::Record as Record>::Field>) -> Select<E>
where
    E: TableMapping,
{
    for (field, value) in filter.terms() {
        let column = E::column(*field);
        select = match value {
            FieldValue::Null => select.filter(column.is_null()),
            value => select.filter(column.eq(db_value(value))),
        };
    }
    select
}

#[async_trait]
impl<E> PagedRepository<E::Record> for PostgresBaseRepository<E>
where
    E: TableMapping,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
{
    async fn find_where(
        &self,
        filter: &Filter<<E::Record as Record>::Field>,
        options: &FindOptions<<E::Record as Record>::Field>,
    ) -> Result<Vec<E::Record>, RepoError> {
        let (field, direction) = options.ordering::<E::Record>();
        tracing::debug!(
            table = %self.table(),
            terms = filter.terms().len(),
            limit = options.limit,
            page = options.page,
            "find_where"
        );

        if options.is_past_end() {
            return Ok(Vec::new());
        }

        let rows = apply_filter::<E>(E::find(), filter)
            .order_by(E::column(field), order(direction))
            .offset(options.offset())
            .limit(options.limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Filter<<E::Record as Record>::Field>) -> Result<u64, RepoError> {
        apply_filter::<E>(E::find(), filter)
            .count(&self.db)
            .await
            .map_err(repo_error)
    }

    async fn create(
        &self,
        draft: <E::Record as Record>::Draft,
    ) -> Result<E::Record, RepoError> {
        let model = E::insertion(draft, Utc::now())
            .insert(&self.db)
            .await
            .map_err(repo_error)?;

        let record: E::Record = model.into();
        tracing::debug!(table = %self.table(), id = record.id(), "Row created");
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        changes: <E::Record as Record>::Changes,
    ) -> Result<bool, RepoError> {
        let result = E::update_many()
            .set(E::changeset(changes, Utc::now()))
            .filter(E::column(<E::Record as Record>::ID).eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        tracing::debug!(
            table = %self.table(),
            id,
            rows_affected = result.rows_affected,
            "Row updated"
        );
        Ok(true)
    }
}
