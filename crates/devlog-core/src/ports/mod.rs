//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assistant;
mod rate_limit;
mod repository;

pub use assistant::{
    AssistantError, ContentAssistant, GeneratePostParams, GeneratedPost, PostLength, Tone,
};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::PostRepository;
