use std::fmt;
use std::str::FromStr;

use super::api::{ChatMessage, GeneratedCard};
use super::client::{CompletionClient, OpenAiClient};
use super::errors::{AiError, AiResult};
use super::prompts;
use crate::config::AiConfig;
use crate::storage::Flashcard;

/// Text transformations applied to a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiOperation {
    Explain,
    Expand,
    Summarize,
}

impl AiOperation {
    pub const ALL: [AiOperation; 3] = [Self::Explain, Self::Expand, Self::Summarize];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explain => "explain",
            Self::Expand => "expand",
            Self::Summarize => "summarize",
        }
    }

    fn messages(&self, text: &str) -> Vec<ChatMessage> {
        match self {
            Self::Explain => prompts::explain(text),
            Self::Expand => prompts::expand(text),
            Self::Summarize => prompts::summarize(text),
        }
    }

    fn empty_input_message(&self) -> &'static str {
        match self {
            Self::Explain => "No text provided to explain",
            Self::Expand => "No text provided to expand",
            Self::Summarize => "No text provided to summarize",
        }
    }
}

impl fmt::Display for AiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown AI operation: {}", s))
    }
}

/// Stateless front door to the remote model.
///
/// Every call is a single attempt; input is validated before anything is
/// sent.
pub struct AiGateway<C = OpenAiClient> {
    client: C,
}

impl AiGateway<OpenAiClient> {
    pub fn from_config(config: &AiConfig) -> AiResult<Self> {
        Ok(Self::new(OpenAiClient::new(config.clone())?))
    }
}

impl<C: CompletionClient> AiGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run an explain/expand/summarize request over `text`
    pub async fn execute(&self, operation: AiOperation, text: &str) -> AiResult<String> {
        if text.trim().is_empty() {
            return Err(AiError::EmptyInput(operation.empty_input_message()));
        }

        log::info!("Running AI {} on {} chars", operation, text.len());
        self.client.complete(&operation.messages(text)).await
    }

    /// Ask the model for study cards covering `content`.
    ///
    /// The cards come back with fresh ids and no note association.
    pub async fn generate_flashcards(&self, content: &str) -> AiResult<Vec<Flashcard>> {
        if content.trim().is_empty() {
            return Err(AiError::EmptyInput("No content provided to generate flashcards"));
        }

        log::info!("Generating flashcards from {} chars", content.len());
        let reply = self.client.complete(&prompts::flashcards(content)).await?;
        parse_flashcards(&reply)
    }
}

/// Parse a model reply holding a JSON array of `{question, answer}` objects
pub fn parse_flashcards(reply: &str) -> AiResult<Vec<Flashcard>> {
    let json = strip_code_fence(reply.trim());
    let cards: Vec<GeneratedCard> = serde_json::from_str(json).map_err(|e| {
        log::warn!("Failed to parse flashcards from model output: {}", e);
        AiError::MalformedOutput(format!("expected a JSON array of flashcards ({})", e))
    })?;

    Ok(cards
        .into_iter()
        .map(|card| Flashcard::new(card.question, card.answer))
        .collect())
}

/// Models often wrap JSON in a ```json fence despite being told not to
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
