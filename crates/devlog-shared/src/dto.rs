//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devlog_core::content::Block;
use devlog_core::domain::{
    Author, CodeSnippet, DEFAULT_READ_TIME, NewPost, Post, PostChanges, PostStatus, SeoMetadata,
};
use devlog_core::error::DomainError;
use devlog_core::ports::{GeneratePostParams, GeneratedPost, PostLength, Tone};
use devlog_core::query::{PageRequest, PostFilter, PostStats, TermCount};

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Body of `POST /api/posts`.
///
/// Every field is optional on the wire so that missing required fields can
/// be reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author: Option<Author>,
    pub tags: Option<Vec<String>>,
    pub code_snippets: Option<Vec<CodeSnippet>>,
    pub cover_image: Option<String>,
    pub metadata: Option<SeoMetadata>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub read_time: Option<u32>,
    pub published_at: Option<DateTime<Utc>>,
}

impl CreatePostRequest {
    /// Required fields in the order they are reported.
    pub const REQUIRED: [&'static str; 6] =
        ["title", "slug", "excerpt", "content", "category", "author"];

    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let author_present = self
            .author
            .as_ref()
            .is_some_and(|a| !a.name.trim().is_empty());
        let checks = [
            present(&self.title),
            present(&self.slug),
            present(&self.excerpt),
            present(&self.content),
            present(&self.category),
            author_present,
        ];

        Self::REQUIRED
            .iter()
            .zip(checks)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Validate and convert into a domain [`NewPost`].
    ///
    /// An unrecognised status falls back to draft.
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<PostStatus>().ok())
            .unwrap_or_default();

        Ok(NewPost {
            slug: self.slug.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            excerpt: self.excerpt.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            author: self
                .author
                .ok_or_else(|| DomainError::MissingFields(vec!["author"]))?,
            category: self.category.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            code_snippets: self.code_snippets.unwrap_or_default(),
            cover_image: non_blank(self.cover_image),
            metadata: self.metadata,
            status,
            featured: self.featured == Some(true),
            read_time: self
                .read_time
                .filter(|minutes| *minutes > 0)
                .unwrap_or(DEFAULT_READ_TIME),
            published_at: self.published_at,
        })
    }
}

/// Body of `PUT /api/posts/{id}`. Absent fields are left untouched.
///
/// `_id`, `createdAt`, `views` and `likes` are not accepted and are
/// silently ignored if sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub code_snippets: Option<Vec<CodeSnippet>>,
    pub cover_image: Option<String>,
    pub metadata: Option<SeoMetadata>,
    pub status: Option<PostStatus>,
    pub featured: Option<bool>,
    pub read_time: Option<u32>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            author: req.author,
            category: req.category,
            tags: req.tags,
            code_snippets: req.code_snippets,
            cover_image: req.cover_image,
            metadata: req.metadata,
            status: req.status,
            featured: req.featured,
            read_time: req.read_time,
            published_at: req.published_at,
        }
    }
}

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListPostsQuery {
    pub fn into_parts(self) -> Result<(PostFilter, PageRequest), DomainError> {
        let status = non_blank(self.status)
            .map(|s| s.parse::<PostStatus>())
            .transpose()?;

        let filter = PostFilter {
            search: non_blank(self.search),
            category: non_blank(self.category),
            status,
            ..Default::default()
        };
        Ok((filter, PageRequest::new(self.page, self.limit)))
    }
}

/// Query string of `GET /api/blog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl BlogQuery {
    pub fn into_parts(self) -> (PostFilter, PageRequest) {
        let filter = PostFilter {
            category: non_blank(self.category),
            tag: non_blank(self.tag),
            ..PostFilter::published()
        };
        (filter, PageRequest::new(self.page, self.limit))
    }
}

/// Query string of `GET /api/blog/featured`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<u64>,
}

/// A published post with its body split into blocks.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostResponse {
    pub post: Post,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub known: Vec<String>,
    pub counts: Vec<TermCount>,
}

/// Dashboard totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_views: u64,
    pub categories: Vec<TermCount>,
}

impl From<PostStats> for StatsResponse {
    fn from(stats: PostStats) -> Self {
        Self {
            total_posts: stats.total,
            published_posts: stats.published,
            draft_posts: stats.drafts,
            total_views: stats.total_views,
            categories: stats.by_category,
        }
    }
}

/// Body of `POST /api/ai/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub tone: Option<String>,
    pub length: Option<String>,
}

impl GeneratePostRequest {
    pub fn into_params(self) -> Result<GeneratePostParams, DomainError> {
        let topic =
            non_blank(self.topic).ok_or_else(|| DomainError::MissingFields(vec!["topic"]))?;
        let tone = non_blank(self.tone)
            .map(|t| t.parse::<Tone>())
            .transpose()?
            .unwrap_or_default();
        let length = non_blank(self.length)
            .map(|l| l.parse::<PostLength>())
            .transpose()?
            .unwrap_or_default();

        Ok(GeneratePostParams {
            topic,
            category: non_blank(self.category),
            tags: self.tags,
            tone,
            length,
        })
    }
}

/// Generated draft plus a slug derived from its title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPostResponse {
    #[serde(flatten)]
    pub post: GeneratedPost,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainCodeRequest {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainCodeResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImproveContentRequest {
    pub content: String,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImproveContentResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedTopicsRequest {
    pub topic: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedTopicsResponse {
    pub topics: Vec<String>,
}
