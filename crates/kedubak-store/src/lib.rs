//! Data-access layer: object-safe async traits over the user and post
//! collections, constructed once at startup and injected into the server
//! state. Conditional mutations (upvote push, comment append, field merge)
//! are single store operations so a check can never race its write.

pub mod memory;

pub use memory::{MemoryPostStore, MemoryUserStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kedubak_common::models::post::{Comment, Post, PostPatch};
use kedubak_common::models::user::{User, UserPatch};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of the conditional upvote push. A repeated vote is a business
/// outcome, not a failure.
#[derive(Debug, Clone)]
pub enum UpvoteOutcome {
    Applied(Post),
    AlreadyVoted,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` if the email is taken.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Merge the provided fields into the user addressed by `email` and
    /// return the updated document, `None` if no user matches. An email
    /// change keeps the uniqueness invariant (`Duplicate` on collision).
    async fn update(&self, email: &str, patch: UserPatch) -> Result<Option<User>, StoreError>;

    async fn touch_last_upvote(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Returns true if a user was removed.
    async fn delete_by_email(&self, email: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// Newest first, at most `limit` documents.
    async fn list(&self, limit: usize) -> Result<Vec<Post>, StoreError>;

    /// Merge the provided fields and return the updated document.
    async fn update_fields(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError>;

    /// Returns true if a post was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Append `voter` to the upvote set only if absent. Condition and push
    /// are one indivisible operation; concurrent votes by the same voter
    /// can never both apply.
    async fn upvote_if_absent(&self, id: Uuid, voter: &str) -> Result<UpvoteOutcome, StoreError>;

    /// Append a comment at the end of the sequence, preserving prior order.
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Post>, StoreError>;
}
