use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Categories offered by the admin editor.
pub const KNOWN_CATEGORIES: [&str; 10] = [
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "DevOps",
    "Cloud",
    "AI/ML",
    "Web Development",
    "Mobile",
];

/// Read time used when the author does not supply one.
pub const DEFAULT_READ_TIME: u32 = 5;

/// Returns true if `category` is one of [`KNOWN_CATEGORIES`].
pub fn is_known_category(category: &str) -> bool {
    KNOWN_CATEGORIES.contains(&category)
}

/// Opaque post identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public visibility of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "status must be 'draft' or 'published', got '{other}'"
            ))),
        }
    }
}

/// Denormalized author details stored on each post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Search engine metadata attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
}

/// Post entity - a blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: Author,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_snippets: Vec<CodeSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SeoMetadata>,
    pub status: PostStatus,
    pub featured: bool,
    pub read_time: u32,
    pub views: u64,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// A validated post that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: Author,
    pub category: String,
    pub tags: Vec<String>,
    pub code_snippets: Vec<CodeSnippet>,
    pub cover_image: Option<String>,
    pub metadata: Option<SeoMetadata>,
    pub status: PostStatus,
    pub featured: bool,
    pub read_time: u32,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewPost {
    /// Materialize the post with a store-assigned id.
    ///
    /// Counters start at zero. A published post without an explicit
    /// publication date is stamped with `now`.
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> Post {
        let published_at = match (self.published_at, self.status) {
            (Some(at), _) => Some(at),
            (None, PostStatus::Published) => Some(now),
            (None, PostStatus::Draft) => None,
        };

        Post {
            id,
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            author: self.author,
            category: self.category,
            tags: normalize_tags(self.tags),
            code_snippets: self.code_snippets,
            cover_image: self.cover_image,
            metadata: self.metadata,
            status: self.status,
            featured: self.featured,
            read_time: self.read_time,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
            published_at,
        }
    }
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
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

impl PostChanges {
    /// Whether these changes publish a post that has never been published.
    pub fn publishes(&self) -> bool {
        self.status == Some(PostStatus::Published) && self.published_at.is_none()
    }

    /// Overwrite every supplied field and refresh `updated_at`.
    ///
    /// A post that becomes published without a publication date is stamped
    /// with `now`.
    pub fn apply(self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(tags) = self.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(snippets) = self.code_snippets {
            post.code_snippets = snippets;
        }
        if let Some(cover) = self.cover_image {
            post.cover_image = Some(cover);
        }
        if let Some(metadata) = self.metadata {
            post.metadata = Some(metadata);
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(featured) = self.featured {
            post.featured = featured;
        }
        if let Some(read_time) = self.read_time {
            post.read_time = read_time;
        }
        if let Some(at) = self.published_at {
            post.published_at = Some(at);
        }
        if post.is_published() && post.published_at.is_none() {
            post.published_at = Some(now);
        }
        post.updated_at = now;
    }
}

/// Trim tags, drop blanks and duplicates. First occurrence wins.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
