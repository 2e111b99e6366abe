//! AI writing assistant port.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::SeoMetadata;
use crate::error::DomainError;

/// Writing tone requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Technical,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
        }
    }
}

impl FromStr for Tone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "technical" => Ok(Tone::Technical),
            other => Err(DomainError::Validation(format!("unknown tone '{other}'"))),
        }
    }
}

/// Target article length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl PostLength {
    /// Word count range handed to the model.
    pub fn word_range(&self) -> &'static str {
        match self {
            PostLength::Short => "500-800",
            PostLength::Medium => "1000-1500",
            PostLength::Long => "2000-3000",
        }
    }
}

impl FromStr for PostLength {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(PostLength::Short),
            "medium" => Ok(PostLength::Medium),
            "long" => Ok(PostLength::Long),
            other => Err(DomainError::Validation(format!("unknown length '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratePostParams {
    pub topic: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tone: Tone,
    pub length: PostLength,
}

/// Draft article produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

/// Assistant failures. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Request to model provider failed: {0}")]
    Request(String),

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Model returned malformed output: {0}")]
    Malformed(String),
}

/// Content generation backed by a large language model.
#[async_trait]
pub trait ContentAssistant: Send + Sync {
    /// Draft a full article on a topic.
    async fn generate_post(&self, params: &GeneratePostParams)
    -> Result<GeneratedPost, AssistantError>;

    /// Explain a code snippet in prose.
    async fn explain_code(&self, code: &str, language: &str) -> Result<String, AssistantError>;

    async fn seo_metadata(&self, title: &str, content: &str)
    -> Result<SeoMetadata, AssistantError>;

    /// Rewrite content following a list of instructions.
    async fn improve_content(
        &self,
        content: &str,
        improvements: &[String],
    ) -> Result<String, AssistantError>;

    /// Suggest follow-up topics for the same audience.
    async fn related_topics(
        &self,
        topic: &str,
        category: &str,
    ) -> Result<Vec<String>, AssistantError>;
}
