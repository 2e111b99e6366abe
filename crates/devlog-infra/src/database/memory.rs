//! In-memory post store - used when MongoDB is not configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use devlog_core::domain::{NewPost, Post, PostChanges, PostId, PostStatus};
use devlog_core::error::RepoError;
use devlog_core::ports::PostRepository;
use devlog_core::query::{
    Page, PageRequest, PostFilter, PostOrder, PostStats, TermCount, sort_term_counts,
};

/// Post store backed by a `Vec` behind an async `RwLock`.
///
/// Mirrors the MongoDB store's semantics, including slug uniqueness.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn slug_taken(posts: &[Post], slug: &str, except: Option<&PostId>) -> bool {
        posts
            .iter()
            .any(|p| p.slug == slug && Some(&p.id) != except)
    }

    async fn increment(
        &self,
        id: &PostId,
        bump: impl FnOnce(&mut Post),
    ) -> Result<Post, RepoError> {
        // The write lock makes read-modify-write atomic.
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepoError::NotFound)?;
        bump(post);
        Ok(post.clone())
    }
}

fn count_terms<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<TermCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for term in terms {
        *counts.entry(term).or_default() += 1;
    }
    let mut counts: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    sort_term_counts(&mut counts);
    counts
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut matched: Vec<&Post> = posts.iter().filter(|p| filter.matches(p)).collect();

        match filter.order {
            PostOrder::Created => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            PostOrder::RecentlyPublished => {
                matched.sort_by(|a, b| b.published_at.cmp(&a.published_at))
            }
        }

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if Self::slug_taken(&posts, &post.slug, None) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                post.slug
            )));
        }

        let id = PostId::new(Uuid::new_v4().simple().to_string());
        let post = post.into_post(id, Utc::now());
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if let Some(slug) = &changes.slug {
            if Self::slug_taken(&posts, slug, Some(id)) {
                return Err(RepoError::Constraint(format!("slug '{slug}' already exists")));
            }
        }

        let post = posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepoError::NotFound)?;
        changes.apply(post, Utc::now());
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| &p.id != id);

        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_views(&self, id: &PostId) -> Result<Post, RepoError> {
        self.increment(id, |p| p.views += 1).await
    }

    async fn increment_likes(&self, id: &PostId) -> Result<Post, RepoError> {
        self.increment(id, |p| p.likes += 1).await
    }

    async fn category_counts(&self) -> Result<Vec<TermCount>, RepoError> {
        let posts = self.posts.read().await;
        Ok(count_terms(
            posts
                .iter()
                .filter(|p| p.is_published())
                .map(|p| p.category.as_str()),
        ))
    }

    async fn tag_counts(&self) -> Result<Vec<TermCount>, RepoError> {
        let posts = self.posts.read().await;
        Ok(count_terms(
            posts
                .iter()
                .filter(|p| p.is_published())
                .flat_map(|p| p.tags.iter().map(String::as_str)),
        ))
    }

    async fn stats(&self) -> Result<PostStats, RepoError> {
        let posts = self.posts.read().await;
        let published = posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .count() as u64;

        Ok(PostStats {
            total: posts.len() as u64,
            published,
            drafts: posts.len() as u64 - published,
            total_views: posts.iter().map(|p| p.views).sum(),
            by_category: count_terms(posts.iter().map(|p| p.category.as_str())),
        })
    }
}
