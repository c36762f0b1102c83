//! Latest-result holders for AI requests.
//!
//! Requests for the same slot may overlap. Each request takes a ticket when
//! it starts, and only the ticket of the most recently started request can
//! store a result; replies from superseded requests are dropped.

use std::collections::{HashMap, HashSet};

use super::gateway::AiOperation;
use crate::storage::Flashcard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSlot {
    Explanation,
    Expansion,
    Summary,
    Flashcards,
}

impl From<AiOperation> for ResultSlot {
    fn from(operation: AiOperation) -> Self {
        match operation {
            AiOperation::Explain => Self::Explanation,
            AiOperation::Expand => Self::Expansion,
            AiOperation::Summarize => Self::Summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Text(String),
    Flashcards(Vec<Flashcard>),
}

/// Proof that a request was started, used to store its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    slot: ResultSlot,
    generation: u64,
}

impl RequestTicket {
    pub fn slot(&self) -> ResultSlot {
        self.slot
    }
}

#[derive(Debug, Default)]
pub struct AiResults {
    next_generation: u64,
    latest: HashMap<ResultSlot, u64>,
    loading: HashSet<ResultSlot>,
    values: HashMap<ResultSlot, SlotValue>,
}

impl AiResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `slot`, superseding any request already running
    pub fn begin(&mut self, slot: ResultSlot) -> RequestTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.latest.insert(slot, generation);
        self.loading.insert(slot);
        RequestTicket { slot, generation }
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.generation)
    }

    /// Store a result. Returns false, leaving the slot untouched, when a newer
    /// request for the same slot has started since `ticket` was issued.
    pub fn complete(&mut self, ticket: RequestTicket, value: SlotValue) -> bool {
        if !self.is_current(ticket) {
            log::debug!("Dropping stale {:?} result", ticket.slot);
            return false;
        }
        self.loading.remove(&ticket.slot);
        self.values.insert(ticket.slot, value);
        true
    }

    /// Record that the request behind `ticket` failed
    pub fn fail(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading.remove(&ticket.slot);
        true
    }

    pub fn is_loading(&self, slot: ResultSlot) -> bool {
        self.loading.contains(&slot)
    }

    pub fn get(&self, slot: ResultSlot) -> Option<&SlotValue> {
        self.values.get(&slot)
    }

    pub fn text(&self, slot: ResultSlot) -> Option<&str> {
        match self.values.get(&slot) {
            Some(SlotValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn clear(&mut self, slot: ResultSlot) {
        self.values.remove(&slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_stores_value() {
        let mut results = AiResults::new();
        let ticket = results.begin(ResultSlot::Explanation);
        assert!(results.is_loading(ResultSlot::Explanation));

        assert!(results.complete(ticket, SlotValue::Text("because".to_string())));
        assert!(!results.is_loading(ResultSlot::Explanation));
        assert_eq!(results.text(ResultSlot::Explanation), Some("because"));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut results = AiResults::new();
        let first = results.begin(ResultSlot::Summary);
        let second = results.begin(ResultSlot::Summary);

        // The newer request finishes first; the older reply arrives late
        assert!(results.complete(second, SlotValue::Text("new".to_string())));
        assert!(!results.complete(first, SlotValue::Text("old".to_string())));
        assert_eq!(results.text(ResultSlot::Summary), Some("new"));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut results = AiResults::new();
        let explain = results.begin(ResultSlot::Explanation);
        let _expand = results.begin(ResultSlot::Expansion);

        assert!(results.complete(explain, SlotValue::Text("e".to_string())));
        assert!(results.is_loading(ResultSlot::Expansion));
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut results = AiResults::new();
        let first = results.begin(ResultSlot::Flashcards);
        let cards = vec![Flashcard::new("Q".to_string(), "A".to_string())];
        results.complete(first, SlotValue::Flashcards(cards.clone()));

        let second = results.begin(ResultSlot::Flashcards);
        assert!(results.fail(second));
        assert!(!results.is_loading(ResultSlot::Flashcards));
        assert_eq!(results.get(ResultSlot::Flashcards), Some(&SlotValue::Flashcards(cards)));
    }

    #[test]
    fn test_clear_removes_value() {
        let mut results = AiResults::new();
        let ticket = results.begin(AiOperation::Expand.into());
        results.complete(ticket, SlotValue::Text("more".to_string()));

        results.clear(ResultSlot::Expansion);
        assert!(results.text(ResultSlot::Expansion).is_none());
    }
}
