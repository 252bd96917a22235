//! Concurrent in-memory storage for Postbook accounts and posts.
//!
//! Two peer stores hold the authoritative records:
//!
//! - [`InMemoryAccountStore`] -- accounts, with a denormalized post counter
//!   used for ordering
//! - [`InMemoryPostStore`] -- posts, each naming its author by [`AccountId`]
//!
//! Both implement the backend traits in [`traits`] and guard their map with
//! a single `RwLock`: list and find share the read lock, mutations take the
//! write lock. Ids come from a monotonic counter and are never reused.
//!
//! [`Blog`] sits on top and enforces what the stores do not: non-empty
//! names and subjects, an existing author for every new post, and an author
//! counter that follows post creation and deletion.
//!
//! Listing is filter, then order, then page (see [`filter`] and [`query`]).
//! Out-of-range pages come back empty, never as errors.

pub mod account;
pub mod blog;
pub mod clock;
pub mod error;
pub mod filter;
pub mod model;
pub mod post;
pub mod query;
pub mod traits;

pub use account::InMemoryAccountStore;
pub use blog::Blog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use filter::{AccountFilter, Page, PostFilter, SortOrder, TimeRange, DEFAULT_LIMIT};
pub use model::{Account, AccountId, AccountPatch, NewAccount, NewPost, Post, PostId, PostPatch};
pub use post::InMemoryPostStore;
pub use traits::{AccountStore, PostStore};
