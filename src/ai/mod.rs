//! AI-assisted text operations
//!
//! This module provides:
//! - Prompt templates for explain / expand / summarize / flashcard generation
//! - An OpenAI-compatible chat-completion client
//! - Latest-result slots guarding against overlapping requests

pub mod api;
pub mod client;
pub mod errors;
pub mod gateway;
pub mod prompts;
pub mod results;

pub use api::ChatMessage;
pub use client::{CompletionClient, OpenAiClient};
pub use errors::{AiError, AiResult};
pub use gateway::{parse_flashcards, AiGateway, AiOperation};
pub use results::{AiResults, RequestTicket, ResultSlot, SlotValue};
