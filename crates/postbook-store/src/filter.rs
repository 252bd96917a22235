//! Filter structs accepted by the list operations.
//!
//! All supplied predicates must hold for a record to match. The name set of
//! [`AccountFilter`] and the author set of [`PostFilter`] are OR-sets: a
//! record matches if its value is any member, and an empty set matches
//! everything.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Account, AccountId, Post};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;

/// Direction for ordering accounts by post count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(StoreError::MalformedInput(format!(
                "unknown sort order {other:?}, expected \"asc\" or \"desc\""
            ))),
        }
    }
}

/// Offset/limit window applied after filtering and ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Inclusive creation-time window. Missing bounds are open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| *at >= from) && self.to.map_or(true, |to| *at <= to)
    }
}

/// Criteria for listing accounts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub created: TimeRange,
    /// Candidate names; empty means any name.
    pub names: Vec<String>,
    pub page: Page,
    /// `None` orders ascending by post count.
    pub order: Option<SortOrder>,
}

impl AccountFilter {
    pub fn matches(&self, account: &Account) -> bool {
        self.created.contains(&account.created_at)
            && (self.names.is_empty() || self.names.iter().any(|n| *n == account.name))
    }
}

/// Criteria for listing posts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub created: TimeRange,
    /// Substring the subject must contain.
    pub subject: Option<String>,
    /// Candidate authors; empty means any author.
    pub authors: Vec<AccountId>,
    pub page: Page,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.created.contains(&post.created_at)
            && self
                .subject
                .as_deref()
                .map_or(true, |needle| post.subject.contains(needle))
            && (self.authors.is_empty() || self.authors.contains(&post.author))
    }
}
