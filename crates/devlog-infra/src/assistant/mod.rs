//! Model provider integrations.

mod openai;
pub mod prompts;

pub use openai::{OpenAiAssistant, OpenAiConfig};
