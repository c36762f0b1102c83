use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to notes created without one
pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh note with the default title and no content
    pub fn blank() -> Self {
        Self::new(UNTITLED_NOTE.to_string(), String::new())
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.touch();
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<Uuid>,
}

impl Flashcard {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            note_id: None,
        }
    }

    /// Copy of this card associated with `note_id`
    pub fn stamped(mut self, note_id: Uuid) -> Self {
        self.note_id = Some(note_id);
        self
    }
}
