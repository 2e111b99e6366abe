//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

#[cfg(feature = "mongodb")]
use devlog_infra::MongoConfig;
#[cfg(feature = "openai")]
use devlog_infra::OpenAiConfig;
#[cfg(feature = "rate-limit")]
use devlog_infra::RateLimitConfig;

#[cfg(feature = "mongodb")]
const DEFAULT_DB_NAME: &str = "tech-developer-blog";

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "mongodb")]
    pub database: Option<MongoConfig>,
    #[cfg(feature = "openai")]
    pub assistant: Option<OpenAiConfig>,
    #[cfg(feature = "rate-limit")]
    pub ai_rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            #[cfg(feature = "mongodb")]
            database: Self::mongo_from_env(),
            #[cfg(feature = "openai")]
            assistant: OpenAiConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            ai_rate_limit: Self::rate_limit_from_env(),
        }
    }

    #[cfg(feature = "mongodb")]
    fn mongo_from_env() -> Option<MongoConfig> {
        let uri = env::var("MONGODB_URI").ok().filter(|u| !u.trim().is_empty())?;
        let database =
            env::var("MONGODB_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());
        let defaults = MongoConfig::new(uri, database);

        Some(MongoConfig {
            max_pool_size: env_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size),
            min_pool_size: env_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size),
            ..defaults
        })
    }

    #[cfg(feature = "rate-limit")]
    fn rate_limit_from_env() -> RateLimitConfig {
        let defaults = RateLimitConfig::default();
        RateLimitConfig {
            max_requests: env_or("AI_RATE_LIMIT_MAX_REQUESTS", defaults.max_requests),
            window: std::time::Duration::from_secs(env_or(
                "AI_RATE_LIMIT_WINDOW_SECS",
                defaults.window.as_secs(),
            )),
        }
    }
}
