//! Post CRUD and counter handlers.

use actix_web::{HttpResponse, web};

use devlog_core::domain::PostId;
use devlog_core::error::DomainError;
use devlog_shared::dto::{CreatePostRequest, ListPostsQuery, UpdatePostRequest};
use devlog_shared::{ApiMessage, PageResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: &PostId) -> AppError {
    DomainError::NotFound {
        entity_type: "Post",
        key: id.to_string(),
    }
    .into()
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let (filter, page) = query.into_inner().into_parts()?;
    let result = state.posts.list(&filter, page).await?;

    Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let new_post = body.into_inner().into_new_post()?;
    let post = state.posts.create(new_post).await?;

    tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let post = state
        .posts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let post = state.posts.update(&id, body.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    state.posts.delete(&id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::Ok().json(ApiMessage::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/views
pub async fn record_view(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let post = state.posts.increment_views(&id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts/{id}/likes
pub async fn record_like(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let post = state.posts.increment_likes(&id).await?;

    Ok(HttpResponse::Ok().json(post))
}
