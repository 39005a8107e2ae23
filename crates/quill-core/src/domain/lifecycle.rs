use serde::{Deserialize, Serialize};

/// Logical lifecycle of a post or comment.
///
/// Rows are never physically removed; deletion moves them to `Deleted`.
/// Persisted as the `is_active` boolean column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted,
}

impl Lifecycle {
    pub fn from_active(is_active: bool) -> Self {
        if is_active {
            Lifecycle::Active
        } else {
            Lifecycle::Deleted
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

