//! OpenAI-compatible chat completion assistant.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use devlog_core::domain::SeoMetadata;
use devlog_core::ports::{AssistantError, ContentAssistant, GeneratePostParams, GeneratedPost};

use super::prompts::{self, Prompt};

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Returns `None` when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let defaults = Self::new(api_key);

        Some(Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model.clone()),
            timeout: std::env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TopicList {
    #[serde(default)]
    topics: Vec<String>,
}

/// Extract the first choice's text, treating blank output as empty.
fn first_content(response: ChatResponse) -> Result<String, AssistantError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, AssistantError> {
    serde_json::from_str(content).map_err(|e| AssistantError::Malformed(e.to_string()))
}

/// Writing assistant backed by the chat completions endpoint.
///
/// One request per call, no retries.
pub struct OpenAiAssistant {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiAssistant {
    pub fn new(config: OpenAiConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        tracing::info!(model = %config.model, base_url = %config.base_url, "AI assistant configured");
        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        ChatRequest {
            model: &self.config.model,
            messages,
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            response_format: prompt.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AssistantError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Model provider returned an error");
            return Err(AssistantError::Request(format!("provider returned {status}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;
        first_content(parsed)
    }
}

#[async_trait]
impl ContentAssistant for OpenAiAssistant {
    async fn generate_post(
        &self,
        params: &GeneratePostParams,
    ) -> Result<GeneratedPost, AssistantError> {
        let content = self.complete(&prompts::generate_post(params)).await?;
        parse_json(&content)
    }

    async fn explain_code(&self, code: &str, language: &str) -> Result<String, AssistantError> {
        self.complete(&prompts::explain_code(code, language)).await
    }

    async fn seo_metadata(
        &self,
        title: &str,
        content: &str,
    ) -> Result<SeoMetadata, AssistantError> {
        let raw = self.complete(&prompts::seo_metadata(title, content)).await?;
        parse_json(&raw)
    }

    async fn improve_content(
        &self,
        content: &str,
        improvements: &[String],
    ) -> Result<String, AssistantError> {
        match self
            .complete(&prompts::improve_content(content, improvements))
            .await
        {
            Err(AssistantError::EmptyResponse) => Ok(content.to_string()),
            other => other,
        }
    }

    async fn related_topics(
        &self,
        topic: &str,
        category: &str,
    ) -> Result<Vec<String>, AssistantError> {
        let raw = self
            .complete(&prompts::related_topics(topic, category))
            .await?;
        let list: TopicList = parse_json(&raw)?;
        Ok(list.topics)
    }
}
