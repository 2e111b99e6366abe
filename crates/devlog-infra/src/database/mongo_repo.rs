//! MongoDB repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, bson};

use devlog_core::domain::{NewPost, Post, PostChanges, PostId};
use devlog_core::error::RepoError;
use devlog_core::ports::PostRepository;
use devlog_core::query::{Page, PageRequest, PostFilter, PostStats, TermCount, sort_term_counts};

use super::connections::MongoPool;
use super::document::{PostDocument, object_id, to_bson_date};
use super::filter::{build_filter, build_sort, build_set};

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn map_err(err: mongodb::error::Error) -> RepoError {
    if is_duplicate_key(&err) {
        RepoError::Constraint("slug already exists".to_string())
    } else {
        RepoError::Query(err.to_string())
    }
}

/// MongoDB post repository.
pub struct MongoPostRepository {
    pool: Arc<MongoPool>,
}

impl MongoPostRepository {
    pub fn new(pool: Arc<MongoPool>) -> Self {
        Self { pool }
    }

    async fn posts(&self) -> Result<Collection<PostDocument>, RepoError> {
        self.pool.posts().await
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Post>, RepoError> {
        let result = self
            .posts()
            .await?
            .find_one(filter)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    /// Apply an update and return the post-image, or `NotFound`.
    async fn update_one(&self, id: &PostId, update: Document) -> Result<Post, RepoError> {
        let oid = object_id(id).ok_or(RepoError::NotFound)?;
        let result = self
            .posts()
            .await?
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_err)?;

        result.map(Into::into).ok_or(RepoError::NotFound)
    }

    async fn count_by(&self, pipeline: Vec<Document>) -> Result<Vec<TermCount>, RepoError> {
        let cursor = self
            .pool
            .database()
            .await?
            .collection::<Document>(super::connections::POSTS_COLLECTION)
            .aggregate(pipeline)
            .await
            .map_err(map_err)?;
        let rows: Vec<Document> = cursor.try_collect().await.map_err(map_err)?;

        let mut counts: Vec<TermCount> = rows
            .into_iter()
            .filter_map(|row| {
                let name = row.get_str("_id").ok()?.to_string();
                let count = read_count(&row, "count");
                Some(TermCount { name, count })
            })
            .collect();
        sort_term_counts(&mut counts);
        Ok(counts)
    }
}

/// `$sum` yields Int32 or Int64 depending on magnitude.
fn read_count(row: &Document, key: &str) -> u64 {
    match row.get(key) {
        Some(bson::Bson::Int32(n)) => u64::try_from(*n).unwrap_or_default(),
        Some(bson::Bson::Int64(n)) => u64::try_from(*n).unwrap_or_default(),
        _ => 0,
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let query = build_filter(filter);
        tracing::debug!(filter = %query, page = page.page(), limit = page.limit(), "Listing posts");

        let posts = self.posts().await?;
        let total = posts
            .count_documents(query.clone())
            .await
            .map_err(map_err)?;
        let cursor = posts
            .find(query)
            .sort(build_sort(filter.order))
            .skip(page.skip())
            .limit(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .await
            .map_err(map_err)?;
        let docs: Vec<PostDocument> = cursor.try_collect().await.map_err(map_err)?;

        Ok(Page::new(
            docs.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let Some(oid) = object_id(id) else {
            tracing::debug!(post_id = %id, "Malformed post id");
            return Ok(None);
        };
        self.find_one(doc! { "_id": oid }).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        self.find_one(doc! { "slug": slug }).await
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let id = PostId::new(ObjectId::new().to_hex());
        let post = post.into_post(id, Utc::now());
        let document = PostDocument::try_from(post.clone())?;

        self.posts()
            .await?
            .insert_one(&document)
            .await
            .map_err(map_err)?;

        tracing::debug!(post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let now = Utc::now();
        let publishes = changes.publishes();
        let post = self
            .update_one(id, doc! { "$set": build_set(changes, now)? })
            .await?;

        if !publishes || post.published_at.is_some() {
            return Ok(post);
        }

        // `publishedAt: null` also matches a missing field.
        let oid = object_id(id).ok_or(RepoError::NotFound)?;
        let stamped = self
            .posts()
            .await?
            .find_one_and_update(
                doc! { "_id": oid, "publishedAt": null },
                doc! { "$set": { "publishedAt": to_bson_date(now) } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_err)?;

        Ok(stamped.map(Into::into).unwrap_or(post))
    }

    async fn delete(&self, id: &PostId) -> Result<(), RepoError> {
        let oid = object_id(id).ok_or(RepoError::NotFound)?;
        let result = self
            .posts()
            .await?
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(map_err)?;

        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn increment_views(&self, id: &PostId) -> Result<Post, RepoError> {
        self.update_one(id, doc! { "$inc": { "views": 1 } }).await
    }

    async fn increment_likes(&self, id: &PostId) -> Result<Post, RepoError> {
        self.update_one(id, doc! { "$inc": { "likes": 1 } }).await
    }

    async fn category_counts(&self) -> Result<Vec<TermCount>, RepoError> {
        self.count_by(vec![
            doc! { "$match": { "status": "published" } },
            doc! { "$group": { "_id": "$category", "count": { "$sum": 1 } } },
        ])
        .await
    }

    async fn tag_counts(&self) -> Result<Vec<TermCount>, RepoError> {
        self.count_by(vec![
            doc! { "$match": { "status": "published" } },
            doc! { "$unwind": "$tags" },
            doc! { "$group": { "_id": "$tags", "count": { "$sum": 1 } } },
        ])
        .await
    }

    async fn stats(&self) -> Result<PostStats, RepoError> {
        let cursor = self
            .pool
            .database()
            .await?
            .collection::<Document>(super::connections::POSTS_COLLECTION)
            .aggregate(vec![doc! {
                "$group": {
                    "_id": "$status",
                    "count": { "$sum": 1 },
                    "views": { "$sum": "$views" },
                }
            }])
            .await
            .map_err(map_err)?;
        let rows: Vec<Document> = cursor.try_collect().await.map_err(map_err)?;

        let mut stats = PostStats::default();
        for row in rows {
            let count = read_count(&row, "count");
            stats.total += count;
            stats.total_views += read_count(&row, "views");
            match row.get_str("_id") {
                Ok("published") => stats.published += count,
                _ => stats.drafts += count,
            }
        }

        stats.by_category = self
            .count_by(vec![doc! {
                "$group": { "_id": "$category", "count": { "$sum": 1 } }
            }])
            .await?;

        Ok(stats)
    }
}
