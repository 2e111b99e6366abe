//! HTTP handlers and route configuration.

mod assistant;
mod blog;
mod health;
mod posts;
mod taxonomy;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;
use devlog_core::ports::RateLimiter;

use crate::middleware::error::payload_error;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// `ai_limiter` guards the `/api/ai` scope when present.
pub fn configure_routes(
    ai_limiter: Option<Arc<dyn RateLimiter>>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(payload_error))
            .app_data(web::QueryConfig::default().error_handler(payload_error))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health::health_check))
                    // Admin post management
                    .service(
                        web::scope("/posts")
                            .route("", web::get().to(posts::list))
                            .route("", web::post().to(posts::create))
                            .route("/{id}", web::get().to(posts::get))
                            .route("/{id}", web::put().to(posts::update))
                            .route("/{id}", web::delete().to(posts::delete))
                            .route("/{id}/views", web::post().to(posts::record_view))
                            .route("/{id}/likes", web::post().to(posts::record_like)),
                    )
                    // Public blog
                    .service(
                        web::scope("/blog")
                            .route("", web::get().to(blog::list))
                            .route("/featured", web::get().to(blog::featured))
                            .route("/{slug}", web::get().to(blog::by_slug)),
                    )
                    .route("/categories", web::get().to(taxonomy::categories))
                    .route("/tags", web::get().to(taxonomy::tags))
                    .route("/admin/stats", web::get().to(taxonomy::stats))
                    // AI assistant
                    .service(
                        web::scope("/ai")
                            .wrap(RateLimitMiddleware::new(ai_limiter))
                            .route("/generate", web::post().to(assistant::generate))
                            .route("/explain", web::post().to(assistant::explain))
                            .route("/seo", web::post().to(assistant::seo))
                            .route("/improve", web::post().to(assistant::improve))
                            .route(
                                "/related-topics",
                                web::post().to(assistant::related_topics),
                            ),
                    ),
            );
    }
}
