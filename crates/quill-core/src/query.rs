//! Exact-match query model shared by every paged repository.
//!
//! A [`Filter`] is a conjunction of `field = value` terms. There is no OR and no
//! range operator; callers that need "active rows only" say so explicitly by
//! adding a lifecycle term.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::Lifecycle;

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest offset a SQL backend can bind (`OFFSET` is a signed bigint).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A typed column value used in filters and ordering.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Matches `IS NULL` when used in a filter.
    Null,
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Lifecycle> for FieldValue {
    fn from(value: Lifecycle) -> Self {
        FieldValue::Bool(value.is_active())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A row type that can be stored behind a [`PagedRepository`](crate::ports::PagedRepository).
///
/// `Draft` is the payload of a create, `Changes` the partial payload of an
/// update. Soft deletion is expressed as a `Changes` value so that it goes
/// through exactly the same update path.
pub trait Record: Clone + Send + Sync + 'static {
    /// Column selector for filters and ordering.
    type Field: Copy + Eq + fmt::Debug + Send + Sync + 'static;
    type Draft: Send + 'static;
    type Changes: Send + 'static;

    /// The primary key column, used for the default ordering.
    const ID: Self::Field;

    /// Columns no two rows may share.
    const UNIQUE: &'static [Self::Field] = &[];

    fn id(&self) -> i64;

    /// Current value of `field` on this row.
    fn value(&self, field: Self::Field) -> FieldValue;

    /// Materialize a draft as a stored row.
    fn from_draft(id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply a partial update in place.
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);

    /// The change set that marks a row as deleted.
    fn retirement() -> Self::Changes;
}

/// Exact-match conjunction over columns.
#[derive(Debug, Clone)]
pub struct Filter<F> {
    terms: Vec<(F, FieldValue)>,
}

impl<F> Default for Filter<F> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<F: Copy> Filter<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field = value` term.
    pub fn eq(mut self, field: F, value: impl Into<FieldValue>) -> Self {
        self.terms.push((field, value.into()));
        self
    }

    pub fn terms(&self) -> &[(F, FieldValue)] {
        &self.terms
    }

    /// Evaluate the filter against an in-memory row.
    pub fn matches<R>(&self, row: &R) -> bool
    where
        R: Record<Field = F>,
    {
        self.terms
            .iter()
            .all(|(field, expected)| row.value(*field) == *expected)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering and pagination for `find_where`.
#[derive(Debug, Clone, Copy)]
pub struct FindOptions<F> {
    /// `None` orders by primary key descending.
    pub order_by: Option<(F, Direction)>,
    pub limit: u64,
    /// 1-based page number.
    pub page: u64,
}

impl<F> Default for FindOptions<F> {
    fn default() -> Self {
        Self {
            order_by: None,
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

impl<F: Copy> FindOptions<F> {
    pub fn order_by(mut self, field: F, direction: Direction) -> Self {
        self.order_by = Some((field, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Rows to skip: `(page - 1) * limit`. Page 0 behaves like page 1.
    /// Capped at [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }

    /// Whether the requested page starts beyond any storable row.
    pub fn is_past_end(&self) -> bool {
        self.offset() == MAX_OFFSET
    }

    /// Resolve the effective ordering for a record type.
    pub fn ordering<R>(&self) -> (F, Direction)
    where
        R: Record<Field = F>,
    {
        self.order_by.unwrap_or((R::ID, Direction::Desc))
    }
}

/// Compare two rows on `field` in the given direction.
pub fn compare_rows<R: Record>(a: &R, b: &R, field: R::Field, direction: Direction) -> Ordering {
    let ordering = a
        .value(field)
        .partial_cmp(&b.value(field))
        .unwrap_or(Ordering::Equal);

    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, CommentField, NewComment};

    fn comment(id: i64, post_id: i64, published: bool) -> Comment {
        Comment::from_draft(
            id,
            NewComment {
                user_id: Some(1),
                post_id,
                content: format!("comment {id}"),
                published,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_offset_is_zero_based_from_one_based_page() {
        let options: FindOptions<CommentField> = FindOptions::default().limit(5).page(3);
        assert_eq!(options.offset(), 10);

        let first: FindOptions<CommentField> = FindOptions::default();
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn test_page_zero_behaves_like_first_page() {
        let options: FindOptions<CommentField> = FindOptions::default().page(0);
        assert_eq!(options.offset(), 0);
    }

    #[test]
    fn test_huge_page_offset_is_capped() {
        let options: FindOptions<CommentField> = FindOptions::default().page(i64::MAX as u64);
        assert_eq!(options.offset(), MAX_OFFSET);
        assert!(options.is_past_end());

        let options: FindOptions<CommentField> = FindOptions::default().page(u64::MAX);
        assert_eq!(options.offset(), MAX_OFFSET);
    }

    #[test]
    fn test_ordinary_page_is_not_past_end() {
        let options: FindOptions<CommentField> = FindOptions::default().page(3);
        assert_eq!(options.offset(), 20);
        assert!(!options.is_past_end());
    }

    #[test]
    fn test_default_ordering_is_primary_key_descending() {
        let options: FindOptions<CommentField> = FindOptions::default();
        assert_eq!(
            options.ordering::<Comment>(),
            (CommentField::Id, Direction::Desc)
        );
    }

    #[test]
    fn test_filter_is_a_conjunction() {
        let row = comment(1, 7, true);

        let both = Filter::new()
            .eq(CommentField::PostId, 7)
            .eq(CommentField::Published, true);
        assert!(both.matches(&row));

        let one_wrong = Filter::new()
            .eq(CommentField::PostId, 7)
            .eq(CommentField::Published, false);
        assert!(!one_wrong.matches(&row));

        assert!(Filter::<CommentField>::new().matches(&row));
    }

    #[test]
    fn test_filter_matches_lifecycle() {
        let mut row = comment(1, 7, true);
        let active = Filter::new().eq(CommentField::Lifecycle, Lifecycle::Active);
        assert!(active.matches(&row));

        row.apply(Comment::retirement(), Utc::now());
        assert!(!active.matches(&row));
    }

    #[test]
    fn test_null_term_matches_missing_owner() {
        let mut row = comment(1, 7, true);
        row.user_id = None;

        let unowned = Filter::new().eq(CommentField::UserId, None::<i64>);
        assert!(unowned.matches(&row));
    }

    #[test]
    fn test_compare_rows_respects_direction() {
        let older = comment(1, 7, true);
        let newer = comment(2, 7, true);

        assert_eq!(
            compare_rows(&older, &newer, CommentField::Id, Direction::Asc),
            Ordering::Less
        );
        assert_eq!(
            compare_rows(&older, &newer, CommentField::Id, Direction::Desc),
            Ordering::Greater
        );
    }
}
