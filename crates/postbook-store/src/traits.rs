//! The [`AccountStore`] and [`PostStore`] traits.
//!
//! Any backend (in-memory, relational) implements these to hold the
//! authoritative records. Cross-references between the two stores are by id
//! value only; neither store checks the other.

use crate::error::StoreResult;
use crate::filter::{AccountFilter, PostFilter};
use crate::model::{Account, AccountId, AccountPatch, NewAccount, NewPost, Post, PostId, PostPatch};

/// Storage backend for accounts.
///
/// Implementations must be thread-safe. Reads may run concurrently; every
/// mutation is atomic with respect to other calls on the same store.
pub trait AccountStore: Send + Sync {
    /// Insert a new account with the next id, `post_count = 0` and
    /// `updated_at = None`. Ids are never reused, even after deletion.
    fn add(&self, account: NewAccount) -> StoreResult<Account>;

    /// Filter, order by post count, then apply the page window.
    fn list(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>>;

    /// Apply the non-empty fields of `patch`.
    ///
    /// `updated_at` is refreshed only when at least one field is applied.
    /// Fails with `AccountNotFound` if the id does not exist.
    fn update(&self, id: AccountId, patch: &AccountPatch) -> StoreResult<Account>;

    /// Remove an account. Returns `Ok(false)` if it did not exist.
    fn delete(&self, id: AccountId) -> StoreResult<bool>;

    fn find_by_id(&self, id: AccountId) -> StoreResult<Account>;

    /// Bump the post counter and return the new value.
    fn increment_post_count(&self, id: AccountId) -> StoreResult<u64>;

    /// Lower the post counter, never below zero, and return the new value.
    fn decrement_post_count(&self, id: AccountId) -> StoreResult<u64>;
}

/// Storage backend for posts.
///
/// The author of a new post is taken as given; resolving it against the
/// account store is the caller's job.
pub trait PostStore: Send + Sync {
    fn add(&self, post: NewPost) -> StoreResult<Post>;

    /// Filter, order by id ascending, then apply the page window.
    fn list(&self, filter: &PostFilter) -> StoreResult<Vec<Post>>;

    /// Apply the non-empty fields of `patch`. Fails with `PostNotFound`.
    fn update(&self, id: PostId, patch: &PostPatch) -> StoreResult<Post>;

    /// Remove a post, returning it if it existed.
    fn delete(&self, id: PostId) -> StoreResult<Option<Post>>;

    fn find_by_id(&self, id: PostId) -> StoreResult<Post>;
}
