use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user::User;

/// A comment is immutable once appended and lives only inside its post.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_first_name: String,
    pub content: String,
}

impl Comment {
    pub fn new(author: &User, content: String) -> Self {
        Self {
            created_at: Utc::now(),
            author_id: author.id,
            author_first_name: author.first_name.clone(),
            content,
        }
    }
}

/// A feed post. `upvotes` is a set of voter emails; the store guarantees
/// each voter appears at most once. Author fields are denormalized at
/// creation time and do not follow later renames.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_first_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub upvotes: Vec<String>,
}

impl Post {
    pub fn new(author: &User, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author.id,
            author_first_name: author.first_name.clone(),
            title,
            content,
            created_at: Utc::now(),
            comments: Vec::new(),
            upvotes: Vec::new(),
        }
    }
}

/// Partial update applied by the store as a single merge.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> User {
        User::new(
            "bob@example.com".to_string(),
            "Bob".to_string(),
            "Durand".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_new_post_starts_empty() {
        let post = Post::new(&author(), "Title".to_string(), "Body".to_string());
        assert!(post.comments.is_empty());
        assert!(post.upvotes.is_empty());
    }

    #[test]
    fn test_post_copies_author_fields() {
        let user = author();
        let post = Post::new(&user, "Title".to_string(), "Body".to_string());
        assert_eq!(post.author_id, user.id);
        assert_eq!(post.author_first_name, "Bob");
    }

    #[test]
    fn test_patch_title_leaves_content_untouched() {
        let mut post = Post::new(&author(), "Old".to_string(), "Body".to_string());
        let patch = PostPatch {
            title: Some("New".to_string()),
            content: None,
        };
        patch.apply(&mut post);
        assert_eq!(post.title, "New");
        assert_eq!(post.content, "Body");
    }
}
