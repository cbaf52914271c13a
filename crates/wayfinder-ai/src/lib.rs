pub mod chat_completions_provider;
pub mod directions;
pub mod llm_provider;

pub use chat_completions_provider::{ChatCompletionsConfig, ChatCompletionsProvider};
pub use directions::*;
pub use llm_provider::*;
