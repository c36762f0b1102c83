//! Instruction templates for each AI operation

use super::api::ChatMessage;

const TUTOR_PERSONA: &str = "You are a helpful computer science tutor. Explain concepts clearly and concisely, as if teaching a university student. Use examples when helpful.";

const WRITING_ASSISTANT_PERSONA: &str = "You are a helpful study assistant who writes clear, accurate notes for university students.";

const FLASHCARD_INSTRUCTIONS: &str = r#"You are a helpful study assistant. Generate flashcards from the provided notes.
Return ONLY a valid JSON array of flashcards with this exact format:
[
  {"question": "What is...", "answer": "..."},
  {"question": "How does...", "answer": "..."}
]
Create 5-10 flashcards focusing on key concepts, definitions, and important details."#;

pub fn explain(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TUTOR_PERSONA),
        ChatMessage::user(format!(
            "Please explain the following text in simpler terms:\n\n{}",
            text
        )),
    ]
}

pub fn expand(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(WRITING_ASSISTANT_PERSONA),
        ChatMessage::user(format!(
            "Please expand on the following text with more detail, context and examples:\n\n{}",
            text
        )),
    ]
}

pub fn summarize(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(WRITING_ASSISTANT_PERSONA),
        ChatMessage::user(format!(
            "Please summarize the following text into its key points:\n\n{}",
            text
        )),
    ]
}

pub fn flashcards(content: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(FLASHCARD_INSTRUCTIONS),
        ChatMessage::user(format!("Generate flashcards from these notes:\n\n{}", content)),
    ]
}
