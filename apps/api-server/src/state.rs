//! Application state - shared across all handlers.

use std::sync::Arc;

use devlog_core::ports::{ContentAssistant, PostRepository, RateLimiter};
use devlog_infra::InMemoryPostRepository;

#[cfg(feature = "mongodb")]
use devlog_infra::{MongoPool, MongoPostRepository};
#[cfg(feature = "openai")]
use devlog_infra::OpenAiAssistant;
#[cfg(feature = "rate-limit")]
use devlog_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    /// `None` when no model provider is configured.
    pub assistant: Option<Arc<dyn ContentAssistant>>,
    /// Guards the `/api/ai` scope.
    pub ai_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = Self {
            posts: Self::post_repository(config).await,
            assistant: Self::assistant(config),
            ai_limiter: Self::ai_limiter(config),
        };

        tracing::info!(
            assistant = state.assistant.is_some(),
            rate_limited = state.ai_limiter.is_some(),
            "Application state initialized"
        );
        state
    }

    #[cfg(feature = "mongodb")]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        let Some(mongo) = config.database.clone() else {
            tracing::warn!("MONGODB_URI not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPostRepository::new());
        };

        let pool = Arc::new(MongoPool::new(mongo));
        let connected = pool.client().await.map(|_| ());
        match connected {
            Ok(()) => {
                tracing::info!(database = pool.database_name(), "Connected to MongoDB");
                Arc::new(MongoPostRepository::new(pool))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to MongoDB: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPostRepository::new())
            }
        }
    }

    #[cfg(not(feature = "mongodb"))]
    async fn post_repository(_config: &AppConfig) -> Arc<dyn PostRepository> {
        tracing::info!("Running without mongodb feature - using in-memory repository");
        Arc::new(InMemoryPostRepository::new())
    }

    #[cfg(feature = "openai")]
    fn assistant(config: &AppConfig) -> Option<Arc<dyn ContentAssistant>> {
        let Some(openai) = config.assistant.clone() else {
            tracing::warn!("OPENAI_API_KEY not set. AI assistant endpoints are disabled.");
            return None;
        };

        match OpenAiAssistant::new(openai) {
            Ok(assistant) => Some(Arc::new(assistant)),
            Err(e) => {
                tracing::error!("Failed to build AI assistant: {}. Endpoints disabled.", e);
                None
            }
        }
    }

    #[cfg(not(feature = "openai"))]
    fn assistant(_config: &AppConfig) -> Option<Arc<dyn ContentAssistant>> {
        tracing::info!("Running without openai feature - AI assistant disabled");
        None
    }

    #[cfg(feature = "rate-limit")]
    fn ai_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        match InMemoryRateLimiter::new(config.ai_rate_limit.clone()) {
            Ok(limiter) => Some(Arc::new(limiter)),
            Err(e) => {
                tracing::error!("Invalid AI rate limit configuration: {}. Limiting disabled.", e);
                None
            }
        }
    }

    #[cfg(not(feature = "rate-limit"))]
    fn ai_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        None
    }
}
