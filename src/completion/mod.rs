//! Chat completion abstraction.
//!
//! The retrieval engine hands an assembled prompt to a completion backend and
//! uses the returned text verbatim as the answer.

mod openai;

pub use openai::OpenAIChatClient;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat completion implementations.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Complete a prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
