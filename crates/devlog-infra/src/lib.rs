//! # Devlog Infrastructure
//!
//! Concrete implementations of the ports defined in `devlog-core`.
//! This crate contains the post stores and the model provider client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongodb` - MongoDB post store
//! - `openai` - OpenAI-compatible chat completion assistant
//! - `rate-limit` - Rate limiting via governor

pub mod database;

#[cfg(feature = "openai")]
pub mod assistant;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use database::InMemoryPostRepository;

#[cfg(feature = "mongodb")]
pub use database::{MongoConfig, MongoPool, MongoPostRepository};

#[cfg(feature = "openai")]
pub use assistant::{OpenAiAssistant, OpenAiConfig};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
