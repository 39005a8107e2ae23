//! In-memory paged repository, generic over any [`Record`].

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::error::RepoError;
use quill_core::ports::PagedRepository;
use quill_core::query::{Filter, FindOptions, Record, compare_rows};

/// Paged repository backed by a `Vec` behind an async RwLock.
///
/// Ids are assigned from a monotonically increasing counter starting at 1.
/// Data is lost on process restart.
pub struct InMemoryRepository<R: Record> {
    rows: RwLock<Vec<R>>,
    next_id: AtomicI64,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Total number of stored rows, deleted ones included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> PagedRepository<R> for InMemoryRepository<R> {
    async fn find_where(
        &self,
        filter: &Filter<R::Field>,
        options: &FindOptions<R::Field>,
    ) -> Result<Vec<R>, RepoError> {
        let rows = self.rows.read().await;
        let (field, direction) = options.ordering::<R>();

        let mut matched: Vec<&R> = rows.iter().filter(|row| filter.matches(*row)).collect();
        matched.sort_by(|a, b| compare_rows(*a, *b, field, direction));

        let offset = usize::try_from(options.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(options.limit).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter<R::Field>) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| filter.matches(*row)).count() as u64)
    }

    async fn create(&self, draft: R::Draft) -> Result<R, RepoError> {
        let mut rows = self.rows.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = R::from_draft(id, draft, Utc::now());
        check_unique(&rows, &row)?;
        rows.push(row.clone());

        Ok(row)
    }

    async fn update(&self, id: i64, changes: R::Changes) -> Result<bool, RepoError> {
        let mut rows = self.rows.write().await;
        let Some(index) = rows.iter().position(|row| row.id() == id) else {
            return Ok(true);
        };

        let mut updated = rows[index].clone();
        updated.apply(changes, Utc::now());
        check_unique(&rows, &updated)?;
        rows[index] = updated;

        Ok(true)
    }
}

/// Reject `candidate` if another row already holds one of its unique values.
fn check_unique<R: Record>(rows: &[R], candidate: &R) -> Result<(), RepoError> {
    for &field in R::UNIQUE {
        let value = candidate.value(field);
        if rows
            .iter()
            .any(|row| row.id() != candidate.id() && row.value(field) == value)
        {
            return Err(RepoError::Constraint(format!("{field:?} already in use")));
        }
    }
    Ok(())
}
