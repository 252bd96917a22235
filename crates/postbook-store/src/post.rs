//! In-memory post store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::filter::PostFilter;
use crate::model::{supplied, NewPost, Post, PostId, PostPatch};
use crate::query::paginate;
use crate::traits::PostStore;

#[derive(Debug)]
struct PostState {
    posts: BTreeMap<PostId, Post>,
    next_id: u64,
}

/// An in-memory implementation of [`PostStore`].
///
/// Same locking discipline as [`InMemoryAccountStore`](crate::InMemoryAccountStore):
/// one `RwLock` over the whole map, ids drawn from a counter under the write
/// lock. Listing walks the map in id order, which is also the output order.
pub struct InMemoryPostStore {
    state: RwLock<PostState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(PostState {
                posts: BTreeMap::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.posts.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.posts.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, PostState>> {
        self.state.read().map_err(|_| StoreError::poisoned("post store"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, PostState>> {
        self.state.write().map_err(|_| StoreError::poisoned("post store"))
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryPostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryPostStore")
            .field("post_count", &count)
            .finish()
    }
}

impl PostStore for InMemoryPostStore {
    fn add(&self, post: NewPost) -> StoreResult<Post> {
        let mut state = self.write()?;
        let id = PostId::new(state.next_id);
        state.next_id += 1;

        let record = Post {
            id,
            subject: post.subject,
            body: post.body,
            author: post.author,
            created_at: self.clock.now(),
            updated_at: None,
        };
        state.posts.insert(id, record.clone());
        tracing::debug!(%id, author = %record.author, "post added");
        Ok(record)
    }

    fn list(&self, filter: &PostFilter) -> StoreResult<Vec<Post>> {
        let matched: Vec<Post> = {
            let state = self.read()?;
            state
                .posts
                .values()
                .filter(|post| filter.matches(post))
                .cloned()
                .collect()
        };
        Ok(paginate(matched, filter.page))
    }

    fn update(&self, id: PostId, patch: &PostPatch) -> StoreResult<Post> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let post = state.posts.get_mut(&id).ok_or(StoreError::PostNotFound(id))?;

        let mut changed = false;
        if let Some(subject) = supplied(&patch.subject) {
            post.subject = subject.to_string();
            changed = true;
        }
        if let Some(body) = supplied(&patch.body) {
            post.body = body.to_string();
            changed = true;
        }
        if changed {
            post.updated_at = Some(now);
            tracing::debug!(%id, "post updated");
        }
        Ok(post.clone())
    }

    fn delete(&self, id: PostId) -> StoreResult<Option<Post>> {
        let removed = self.write()?.posts.remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, "post deleted");
        }
        Ok(removed)
    }

    fn find_by_id(&self, id: PostId) -> StoreResult<Post> {
        self.read()?
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::PostNotFound(id))
    }
}
