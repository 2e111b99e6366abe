//! Translation of domain queries and changes into MongoDB documents.

use chrono::{DateTime, Utc};
use lazy_regex::regex;
use mongodb::bson::{self, Bson, Document, Regex, doc};

use devlog_core::domain::{PostChanges, normalize_tags};
use devlog_core::error::RepoError;
use devlog_core::query::{PostFilter, PostOrder};

use super::document::to_bson_date;

/// Fields searched by free-text search.
pub const SEARCH_FIELDS: [&str; 3] = ["title", "excerpt", "content"];

/// Build the `find` filter for a listing.
pub fn build_filter(filter: &PostFilter) -> Document {
    let mut query = Document::new();

    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }
    if let Some(tag) = &filter.tag {
        query.insert("tags", tag.as_str());
    }
    if let Some(featured) = filter.featured {
        query.insert("featured", featured);
    }
    if let Some(term) = filter.search_term() {
        let pattern = Regex {
            pattern: regex::escape(term),
            options: "i".to_string(),
        };
        let clauses: Vec<Bson> = SEARCH_FIELDS
            .iter()
            .map(|field| {
                let mut clause = Document::new();
                clause.insert(*field, pattern.clone());
                Bson::Document(clause)
            })
            .collect();
        query.insert("$or", clauses);
    }

    query
}

/// Sort document for a listing order.
pub fn build_sort(order: PostOrder) -> Document {
    match order {
        PostOrder::Created => doc! { "createdAt": -1 },
        PostOrder::RecentlyPublished => doc! { "publishedAt": -1, "createdAt": -1 },
    }
}

fn to_bson<T: serde::Serialize>(value: &T) -> Result<Bson, RepoError> {
    bson::to_bson(value).map_err(|e| RepoError::Query(e.to_string()))
}

/// Build the `$set` document for a partial update.
///
/// Only supplied fields are written. `updatedAt` is always refreshed.
pub fn build_set(changes: PostChanges, now: DateTime<Utc>) -> Result<Document, RepoError> {
    let mut set = Document::new();

    if let Some(slug) = changes.slug {
        set.insert("slug", slug);
    }
    if let Some(title) = changes.title {
        set.insert("title", title);
    }
    if let Some(excerpt) = changes.excerpt {
        set.insert("excerpt", excerpt);
    }
    if let Some(content) = changes.content {
        set.insert("content", content);
    }
    if let Some(author) = changes.author {
        set.insert("author", to_bson(&author)?);
    }
    if let Some(category) = changes.category {
        set.insert("category", category);
    }
    if let Some(tags) = changes.tags {
        set.insert("tags", normalize_tags(tags));
    }
    if let Some(snippets) = changes.code_snippets {
        set.insert("codeSnippets", to_bson(&snippets)?);
    }
    if let Some(cover) = changes.cover_image {
        set.insert("coverImage", cover);
    }
    if let Some(metadata) = changes.metadata {
        set.insert("metadata", to_bson(&metadata)?);
    }
    if let Some(status) = changes.status {
        set.insert("status", status.as_str());
    }
    if let Some(featured) = changes.featured {
        set.insert("featured", featured);
    }
    if let Some(read_time) = changes.read_time {
        set.insert("readTime", i32::try_from(read_time).unwrap_or(i32::MAX));
    }
    if let Some(at) = changes.published_at {
        set.insert("publishedAt", to_bson_date(at));
    }
    set.insert("updatedAt", to_bson_date(now));

    Ok(set)
}
