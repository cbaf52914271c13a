//! Wraps a navigation prompt into a chat exchange and asks a provider for
//! bulleted directions.

use crate::llm_provider::{GenerationConfig, LLMProvider, Message};
use anyhow::Result;
use tracing::{debug, info};
use wayfinder_core::interpret_escape_sequences;
use wayfinder_graph::Prompt;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const CLOSING_INSTRUCTION: &str = "OUTPUT DIRECTIONS FROM INITIAL POSITION TO DESIRED POSITION IN BULLETS, each bullet has to be a sentence. ONLY OUTPUT THESE BULLETED DIRECTIONS, NOTHING ELSE.";

/// System message plus the user message `prefix + destination + suffix`,
/// followed by the closing instruction. Literal `\n` markers become real
/// line breaks so the model sees the layout as written.
pub fn direction_messages(prompt: &Prompt, destination: &str) -> Vec<Message> {
    let body = interpret_escape_sequences(&prompt.with_destination(destination));
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!("{}\n\n{}", body, CLOSING_INSTRUCTION)),
    ]
}

pub struct DirectionsAssistant<P: LLMProvider> {
    provider: P,
    generation: GenerationConfig,
}

impl<P: LLMProvider> DirectionsAssistant<P> {
    pub fn new(provider: P, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the model's answer text, trimmed.
    pub async fn ask(&self, prompt: &Prompt, destination: &str) -> Result<String> {
        let messages = direction_messages(prompt, destination);
        debug!(
            destination,
            start = %prompt.report.start,
            "requesting directions"
        );

        let response = self
            .provider
            .generate_chat(&messages, &self.generation)
            .await?;

        info!(
            model = %response.model,
            tokens = ?response.total_tokens,
            "directions received"
        );
        Ok(response.content.trim().to_string())
    }
}
