//! BSON representation of a post.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use devlog_core::domain::{Author, CodeSnippet, Post, PostId, PostStatus, SeoMetadata};
use devlog_core::error::RepoError;

/// A document in the `posts` collection.
///
/// Field names match the ones the web admin has always written, and
/// timestamps are stored as native BSON dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: Author,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_snippets: Vec<CodeSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SeoMetadata>,
    pub status: PostStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub read_time: i32,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<bson::DateTime>,
}

pub(crate) fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

/// Parse a post id into an ObjectId. Malformed ids yield `None`.
pub(crate) fn object_id(id: &PostId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}

impl TryFrom<Post> for PostDocument {
    type Error = RepoError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        let id = object_id(&post.id)
            .ok_or_else(|| RepoError::Query(format!("invalid post id '{}'", post.id)))?;

        Ok(Self {
            id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            author: post.author,
            category: post.category,
            tags: post.tags,
            code_snippets: post.code_snippets,
            cover_image: post.cover_image,
            metadata: post.metadata,
            status: post.status,
            featured: post.featured,
            read_time: i32::try_from(post.read_time).unwrap_or(i32::MAX),
            views: i64::try_from(post.views).unwrap_or(i64::MAX),
            likes: i64::try_from(post.likes).unwrap_or(i64::MAX),
            created_at: to_bson_date(post.created_at),
            updated_at: to_bson_date(post.updated_at),
            published_at: post.published_at.map(to_bson_date),
        })
    }
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Self {
            id: PostId::new(doc.id.to_hex()),
            slug: doc.slug,
            title: doc.title,
            excerpt: doc.excerpt,
            content: doc.content,
            author: doc.author,
            category: doc.category,
            tags: doc.tags,
            code_snippets: doc.code_snippets,
            cover_image: doc.cover_image,
            metadata: doc.metadata,
            status: doc.status,
            featured: doc.featured,
            read_time: u32::try_from(doc.read_time).unwrap_or_default(),
            views: u64::try_from(doc.views).unwrap_or_default(),
            likes: u64::try_from(doc.likes).unwrap_or_default(),
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
            published_at: doc.published_at.map(from_bson_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Bson, doc};

    fn sample() -> Post {
        let now = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap();
        Post {
            id: PostId::new(ObjectId::new().to_hex()),
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: "Short".to_string(),
            content: "Body".to_string(),
            author: Author {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar: None,
            },
            category: "Python".to_string(),
            tags: vec!["python".to_string()],
            code_snippets: vec![CodeSnippet {
                language: "python".to_string(),
                code: "print(1)".to_string(),
                title: None,
            }],
            cover_image: None,
            metadata: None,
            status: PostStatus::Published,
            featured: true,
            read_time: 7,
            views: 3,
            likes: 1,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        }
    }

    #[test]
    fn converts_both_ways_at_millisecond_precision() {
        let post = sample();
        let doc = PostDocument::try_from(post.clone()).unwrap();
        assert_eq!(Post::from(doc), post);
    }

    #[test]
    fn stores_native_dates_and_camel_case_keys() {
        let doc = bson::to_document(&PostDocument::try_from(sample()).unwrap()).unwrap();

        assert!(matches!(doc.get("createdAt"), Some(Bson::DateTime(_))));
        assert!(matches!(doc.get("_id"), Some(Bson::ObjectId(_))));
        assert_eq!(doc.get_str("status").unwrap(), "published");
        assert_eq!(doc.get_i32("readTime").unwrap(), 7);
        assert!(doc.contains_key("codeSnippets"));
        assert!(!doc.contains_key("coverImage"));
    }

    #[test]
    fn reads_documents_missing_optional_fields() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "slug": "legacy",
            "title": "Legacy",
            "excerpt": "",
            "content": "",
            "author": { "name": "Ada", "email": "ada@example.com" },
            "category": "Cloud",
            "status": "draft",
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
        };
        let post: Post = bson::from_document::<PostDocument>(raw).unwrap().into();

        assert_eq!(post.views, 0);
        assert!(post.tags.is_empty());
        assert_eq!(post.published_at, None);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(object_id(&PostId::new("not-an-object-id")).is_none());
        let mut post = sample();
        post.id = PostId::new("xyz");
        assert!(PostDocument::try_from(post).is_err());
    }
}
