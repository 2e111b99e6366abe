//! Public blog pages: published listings and rendered posts.

use actix_web::{HttpResponse, web};

use devlog_core::content;
use devlog_core::error::DomainError;
use devlog_core::query::{PageRequest, PostFilter};
use devlog_shared::PageResponse;
use devlog_shared::dto::{BlogPostResponse, BlogQuery, FeaturedQuery};

use crate::middleware::error::AppResult;
use crate::state::AppState;

const DEFAULT_FEATURED_LIMIT: u64 = 5;

/// GET /api/blog
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<BlogQuery>,
) -> AppResult<HttpResponse> {
    let (filter, page) = query.into_inner().into_parts();
    let result = state.posts.list(&filter, page).await?;

    Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/blog/featured
pub async fn featured(
    state: web::Data<AppState>,
    query: web::Query<FeaturedQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter {
        featured: Some(true),
        ..PostFilter::published()
    };
    let page = PageRequest::new(None, Some(query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT)));
    let result = state.posts.list(&filter, page).await?;

    Ok(HttpResponse::Ok().json(result.items))
}

/// GET /api/blog/{slug}
///
/// Drafts are hidden exactly like unknown slugs.
pub async fn by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .filter(|post| post.is_published())
        .ok_or(DomainError::NotFound {
            entity_type: "Post",
            key: slug,
        })?;

    let blocks = content::render(&post.content);
    Ok(HttpResponse::Ok().json(BlogPostResponse { post, blocks }))
}
