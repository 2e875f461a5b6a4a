pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{build_prompt, PromptContext};

use crate::error::Result;
use async_trait::async_trait;

/// Language-model backend that turns a question plus weather context into an answer
#[async_trait]
pub trait AdvisoryComposer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn compose(&self, question: &str, context: &PromptContext) -> Result<String>;
}
