//! Embedded document store. Every conditional mutation runs entirely under
//! the collection's write guard, which realizes the atomic
//! conditional-update contract without a network round trip. A remote
//! document-store driver can replace these types behind the same traits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kedubak_common::models::post::{Comment, Post, PostPatch};
use kedubak_common::models::user::{User, UserPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{PostStore, StoreError, UpvoteOutcome, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn update(&self, email: &str, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(id) = users.values().find(|u| u.email == email).map(|u| u.id) else {
            return Ok(None);
        };
        if let Some(new_email) = &patch.email {
            if users.values().any(|u| u.id != id && &u.email == new_email) {
                return Err(StoreError::Duplicate(new_email.clone()));
            }
        }
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(user);
        Ok(Some(user.clone()))
    }

    async fn touch_last_upvote(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.last_upvote_at = at;
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let Some(id) = users.values().find(|u| u.email == email).map(|u| u.id) else {
            return Ok(false);
        };
        users.remove(&id);
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all.truncate(limit);
        Ok(all)
    }

    async fn update_fields(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(post);
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        Ok(posts.remove(&id).is_some())
    }

    async fn upvote_if_absent(&self, id: Uuid, voter: &str) -> Result<UpvoteOutcome, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        if post.upvotes.iter().any(|v| v == voter) {
            return Ok(UpvoteOutcome::AlreadyVoted);
        }
        post.upvotes.push(voter.to_string());
        Ok(UpvoteOutcome::Applied(post.clone()))
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Post>, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        post.comments.push(comment);
        Ok(Some(post.clone()))
    }
}
