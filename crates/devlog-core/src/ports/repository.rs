use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::RepoError;
use crate::query::{Page, PageRequest, PostFilter, PostStats, TermCount};

/// Post storage.
///
/// Lookups return `Ok(None)` for unknown ids or slugs. Mutations of a
/// missing post return [`RepoError::NotFound`], and a slug collision
/// returns [`RepoError::Constraint`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List posts matching `filter`, newest first.
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Store a new post and return it with its assigned id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply a partial update and return the post as stored afterwards.
    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError>;

    /// Hard delete.
    async fn delete(&self, id: &PostId) -> Result<(), RepoError>;

    /// Atomically add one to the view counter.
    async fn increment_views(&self, id: &PostId) -> Result<Post, RepoError>;

    /// Atomically add one to the like counter.
    async fn increment_likes(&self, id: &PostId) -> Result<Post, RepoError>;

    /// Published post counts per category.
    async fn category_counts(&self) -> Result<Vec<TermCount>, RepoError>;

    /// Published post counts per tag.
    async fn tag_counts(&self) -> Result<Vec<TermCount>, RepoError>;

    /// Totals across the whole collection, drafts included.
    async fn stats(&self) -> Result<PostStats, RepoError>;
}
