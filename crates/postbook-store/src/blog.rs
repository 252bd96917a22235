//! The orchestrator that keeps the two stores consistent.
//!
//! [`Blog`] validates creation input, resolves post authors against the
//! account store, and keeps each author's `post_count` in step with post
//! creation and deletion.
//!
//! Post mutations that touch a counter run under one orchestrator mutex, so
//! no other add/delete can interleave between the post change and the
//! counter change. Readers do not take that mutex and may briefly observe a
//! post whose author counter has not caught up yet.
//!
//! Deleting an account does not delete its posts; they keep pointing at the
//! vanished id.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::Clock;
use crate::error::{StoreError, StoreResult};
use crate::filter::{AccountFilter, PostFilter};
use crate::model::{
    Account, AccountId, AccountPatch, NewAccount, NewPost, Post, PostId, PostPatch,
};
use crate::traits::{AccountStore, PostStore};
use crate::{InMemoryAccountStore, InMemoryPostStore};

/// Account and post stores behind one validating facade.
#[derive(Clone)]
pub struct Blog {
    accounts: Arc<dyn AccountStore>,
    posts: Arc<dyn PostStore>,
    mutations: Arc<Mutex<()>>,
}

impl Blog {
    pub fn new(accounts: Arc<dyn AccountStore>, posts: Arc<dyn PostStore>) -> Self {
        Self {
            accounts,
            posts,
            mutations: Arc::new(Mutex::new(())),
        }
    }

    /// A blog over fresh in-memory stores using the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryPostStore::new()),
        )
    }

    /// A blog over fresh in-memory stores sharing `clock`.
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(InMemoryAccountStore::with_clock(clock.clone())),
            Arc::new(InMemoryPostStore::with_clock(clock)),
        )
    }

    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    pub fn posts(&self) -> &dyn PostStore {
        self.posts.as_ref()
    }

    fn lock_mutations(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.mutations
            .lock()
            .map_err(|_| StoreError::poisoned("blog mutation"))
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    pub fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        if account.name.trim().is_empty() {
            return Err(StoreError::Validation("name is required".into()));
        }
        self.accounts.add(account)
    }

    pub fn list_accounts(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        self.accounts.list(filter)
    }

    pub fn find_account(&self, id: AccountId) -> StoreResult<Account> {
        self.accounts.find_by_id(id)
    }

    pub fn update_account(&self, id: AccountId, patch: &AccountPatch) -> StoreResult<Account> {
        self.accounts.update(id, patch)
    }

    /// Remove an account. Its posts are left in place.
    pub fn delete_account(&self, id: AccountId) -> StoreResult<bool> {
        let _guard = self.lock_mutations()?;
        self.accounts.delete(id)
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Create a post for an existing author and bump the author's counter.
    pub fn add_post(&self, post: NewPost) -> StoreResult<Post> {
        if post.subject.trim().is_empty() {
            return Err(StoreError::Validation("subject is required".into()));
        }
        if post.author.get() == 0 {
            return Err(StoreError::Validation("author must be a positive id".into()));
        }

        let _guard = self.lock_mutations()?;
        let author = self.accounts.find_by_id(post.author)?;
        let created = self.posts.add(post)?;
        if let Err(err) = self.accounts.increment_post_count(author.id) {
            tracing::warn!(author = %author.id, post = %created.id, error = %err, "post count not incremented");
        }
        Ok(created)
    }

    pub fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<Post>> {
        self.posts.list(filter)
    }

    pub fn find_post(&self, id: PostId) -> StoreResult<Post> {
        self.posts.find_by_id(id)
    }

    pub fn update_post(&self, id: PostId, patch: &PostPatch) -> StoreResult<Post> {
        self.posts.update(id, patch)
    }

    /// Remove a post and lower its author's counter. Absent ids are a no-op.
    pub fn delete_post(&self, id: PostId) -> StoreResult<bool> {
        let _guard = self.lock_mutations()?;
        let Some(removed) = self.posts.delete(id)? else {
            return Ok(false);
        };
        if let Err(err) = self.accounts.decrement_post_count(removed.author) {
            tracing::warn!(author = %removed.author, post = %id, error = %err, "post count not decremented");
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Blog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog_with_alice() -> (Blog, Account) {
        let blog = Blog::in_memory();
        let alice = blog
            .create_account(NewAccount::new("Alice", "555-0100"))
            .unwrap();
        (blog, alice)
    }

    #[test]
    fn create_account_requires_name() {
        let blog = Blog::in_memory();
        let err = blog.create_account(NewAccount::new("  ", "555")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(blog.list_accounts(&AccountFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn add_post_validates_input() {
        let (blog, alice) = blog_with_alice();

        let empty_subject = blog.add_post(NewPost::new("", "body", alice.id)).unwrap_err();
        assert!(matches!(empty_subject, StoreError::Validation(_)));

        let zero_author = blog
            .add_post(NewPost::new("Hello", "", AccountId::new(0)))
            .unwrap_err();
        assert!(matches!(zero_author, StoreError::Validation(_)));
    }

    #[test]
    fn add_post_requires_existing_author() {
        let blog = Blog::in_memory();
        let err = blog
            .add_post(NewPost::new("Hello", "World", AccountId::new(7)))
            .unwrap_err();
        assert_eq!(err, StoreError::AccountNotFound(AccountId::new(7)));
        assert!(blog.list_posts(&PostFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn alice_scenario_has_no_cascade() {
        let (blog, alice) = blog_with_alice();
        assert_eq!(alice.id, AccountId::new(1));
        assert_eq!(alice.post_count, 0);
        assert!(alice.updated_at.is_none());

        let post = blog.add_post(NewPost::new("Hello", "World", alice.id)).unwrap();
        assert_eq!(post.id, PostId::new(1));
        assert_eq!(blog.find_account(alice.id).unwrap().post_count, 1);

        assert!(blog.delete_account(alice.id).unwrap());
        assert_eq!(
            blog.find_account(alice.id).unwrap_err(),
            StoreError::AccountNotFound(alice.id)
        );
        assert_eq!(blog.find_post(post.id).unwrap(), post);
    }

    #[test]
    fn delete_post_decrements_author() {
        let (blog, alice) = blog_with_alice();
        let first = blog.add_post(NewPost::new("one", "", alice.id)).unwrap();
        blog.add_post(NewPost::new("two", "", alice.id)).unwrap();
        assert_eq!(blog.find_account(alice.id).unwrap().post_count, 2);

        assert!(blog.delete_post(first.id).unwrap());
        assert_eq!(blog.find_account(alice.id).unwrap().post_count, 1);

        assert!(!blog.delete_post(first.id).unwrap());
        assert_eq!(blog.find_account(alice.id).unwrap().post_count, 1);
    }

    #[test]
    fn deleting_orphaned_post_still_succeeds() {
        let (blog, alice) = blog_with_alice();
        let post = blog.add_post(NewPost::new("one", "", alice.id)).unwrap();
        blog.delete_account(alice.id).unwrap();
        assert!(blog.delete_post(post.id).unwrap());
    }

    #[test]
    fn post_counts_drive_account_order() {
        let blog = Blog::in_memory();
        for (name, posts) in [("three", 3), ("one", 1), ("two", 2)] {
            let account = blog.create_account(NewAccount::new(name, "")).unwrap();
            for i in 0..posts {
                blog.add_post(NewPost::new(format!("{name}-{i}"), "", account.id))
                    .unwrap();
            }
        }

        let filter = AccountFilter {
            order: Some(crate::SortOrder::Desc),
            ..Default::default()
        };
        let names: Vec<String> = blog
            .list_accounts(&filter)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["three", "two", "one"]);
    }

    #[test]
    fn concurrent_posting_keeps_counter_exact() {
        let (blog, alice) = blog_with_alice();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let blog = blog.clone();
                scope.spawn(move || {
                    for i in 0..25 {
                        let post = blog
                            .add_post(NewPost::new(format!("{t}-{i}"), "", alice.id))
                            .unwrap();
                        if i % 5 == 0 {
                            blog.delete_post(post.id).unwrap();
                        }
                    }
                });
            }
        });
        let live = blog
            .list_posts(&PostFilter {
                page: crate::Page::new(0, usize::MAX),
                ..Default::default()
            })
            .unwrap()
            .len() as u64;
        assert_eq!(live, 80);
        assert_eq!(blog.find_account(alice.id).unwrap().post_count, live);
    }
}
