//! Categories, tags and dashboard statistics.

use actix_web::{HttpResponse, web};

use devlog_core::domain::KNOWN_CATEGORIES;
use devlog_shared::dto::{CategoriesResponse, StatsResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let counts = state.posts.category_counts().await?;

    Ok(HttpResponse::Ok().json(CategoriesResponse {
        known: KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        counts,
    }))
}

/// GET /api/tags
pub async fn tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.posts.tag_counts().await?))
}

/// GET /api/admin/stats
pub async fn stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.posts.stats().await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}
