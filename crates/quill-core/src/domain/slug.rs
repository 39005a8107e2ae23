use std::fmt;

use serde::Serialize;

use crate::error::DomainError;

/// A normalized, URL-safe post identifier.
///
/// Lowercase ASCII letters and digits are kept; every other run of characters
/// collapses into a single hyphen, and hyphens never lead or trail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut slug = String::with_capacity(raw.len());
        let mut pending_hyphen = false;

        for c in raw.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        if slug.is_empty() {
            return Err(DomainError::InvalidSlug(raw.to_string()));
        }

        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_title_like_input() {
        let slug = Slug::parse("My First Post!").unwrap();
        assert_eq!(slug.as_str(), "my-first-post");
    }

    #[test]
    fn test_collapses_separator_runs() {
        let slug = Slug::parse("  Rust -- and   SQL__2020 ").unwrap();
        assert_eq!(slug.as_str(), "rust-and-sql-2020");
    }

    #[test]
    fn test_already_normalized_is_unchanged() {
        let slug = Slug::parse("already-fine-42").unwrap();
        assert_eq!(slug.as_str(), "already-fine-42");
    }

    #[test]
    fn test_casing_and_spacing_variants_collide() {
        assert_eq!(
            Slug::parse("Hello World").unwrap(),
            Slug::parse("  hello   WORLD!!").unwrap()
        );
    }

    #[test]
    fn test_rejects_input_without_alphanumerics() {
        assert_eq!(
            Slug::parse("!!! ---"),
            Err(DomainError::InvalidSlug("!!! ---".to_string()))
        );
        assert!(Slug::parse("").is_err());
    }

    #[test]
    fn test_non_ascii_letters_act_as_separators() {
        let slug = Slug::parse("Café au lait").unwrap();
        assert_eq!(slug.as_str(), "caf-au-lait");
    }
}
