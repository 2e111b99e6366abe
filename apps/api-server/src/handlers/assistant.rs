//! AI writing assistant endpoints.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use devlog_core::domain::slugify;
use devlog_core::ports::ContentAssistant;
use devlog_shared::dto::{
    ExplainCodeRequest, ExplainCodeResponse, GeneratePostRequest, GeneratedPostResponse,
    ImproveContentRequest, ImproveContentResponse, RelatedTopicsRequest, RelatedTopicsResponse,
    SeoRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn assistant(state: &AppState) -> AppResult<Arc<dyn ContentAssistant>> {
    state
        .assistant
        .clone()
        .ok_or_else(|| AppError::Unavailable("AI assistant is not configured".to_string()))
}

/// POST /api/ai/generate
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GeneratePostRequest>,
) -> AppResult<HttpResponse> {
    let assistant = assistant(&state)?;
    let params = body.into_inner().into_params()?;

    tracing::debug!(topic = %params.topic, tone = params.tone.as_str(), "Generating post");
    let post = assistant
        .generate_post(&params)
        .await
        .map_err(AppError::assistant("Post generation"))?;

    let slug = slugify(&post.title);
    Ok(HttpResponse::Ok().json(GeneratedPostResponse { post, slug }))
}

/// POST /api/ai/explain
pub async fn explain(
    state: web::Data<AppState>,
    body: web::Json<ExplainCodeRequest>,
) -> AppResult<HttpResponse> {
    let assistant = assistant(&state)?;
    let explanation = assistant
        .explain_code(&body.code, &body.language)
        .await
        .map_err(AppError::assistant("Code explanation"))?;

    Ok(HttpResponse::Ok().json(ExplainCodeResponse { explanation }))
}

/// POST /api/ai/seo
pub async fn seo(
    state: web::Data<AppState>,
    body: web::Json<SeoRequest>,
) -> AppResult<HttpResponse> {
    let assistant = assistant(&state)?;
    let metadata = assistant
        .seo_metadata(&body.title, &body.content)
        .await
        .map_err(AppError::assistant("SEO metadata generation"))?;

    Ok(HttpResponse::Ok().json(metadata))
}

/// POST /api/ai/improve
pub async fn improve(
    state: web::Data<AppState>,
    body: web::Json<ImproveContentRequest>,
) -> AppResult<HttpResponse> {
    let assistant = assistant(&state)?;
    let content = assistant
        .improve_content(&body.content, &body.improvements)
        .await
        .map_err(AppError::assistant("Content improvement"))?;

    Ok(HttpResponse::Ok().json(ImproveContentResponse { content }))
}

/// POST /api/ai/related-topics
pub async fn related_topics(
    state: web::Data<AppState>,
    body: web::Json<RelatedTopicsRequest>,
) -> AppResult<HttpResponse> {
    let assistant = assistant(&state)?;
    let topics = assistant
        .related_topics(&body.topic, &body.category)
        .await
        .map_err(AppError::assistant("Related topic suggestion"))?;

    Ok(HttpResponse::Ok().json(RelatedTopicsResponse { topics }))
}
