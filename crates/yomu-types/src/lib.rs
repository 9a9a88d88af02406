use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod view;

pub use view::{ExampleEntry, ExplainState, PaneBody, PaneView, Section, SectionTree};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Dictionary content changed for a new query
    ContentUpdated(ContentUpdate),
    /// Dictionary content was cleared (new page, panel closed)
    ContentCleared,
    /// User pressed the explain button
    ExplainClicked,
    Shutdown,
}

/// Content update as emitted by the display layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentUpdate {
    pub word: String,
    #[serde(default)]
    pub modifier_keys: BTreeSet<String>,
    #[serde(default)]
    pub sentence: Option<Sentence>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
}

/// A single lookup the explainer reacts to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupEvent {
    pub word: String,
    /// Surrounding sentence, may be empty
    pub context: String,
    pub modifiers: BTreeSet<String>,
}

impl LookupEvent {
    pub fn new(word: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            context: context.into(),
            modifiers: BTreeSet::new(),
        }
    }

    pub fn with_modifier(mut self, key: impl Into<String>) -> Self {
        self.modifiers.insert(key.into());
        self
    }
}

impl From<ContentUpdate> for LookupEvent {
    fn from(update: ContentUpdate) -> Self {
        Self {
            word: update.word,
            context: update.sentence.map(|s| s.text).unwrap_or_default(),
            modifiers: update.modifier_keys,
        }
    }
}

/// Model output after defensive field extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplanationResult {
    pub title: Option<String>,
    pub word: Option<String>,
    pub meaning: Option<String>,
    pub meaning_in_context: Option<String>,
    pub usage: Option<String>,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Example {
    pub text: Option<String>,
    pub explain: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_update_converts_sentence_to_context() {
        let update: ContentUpdate = serde_json::from_str(
            r#"{"word":"run","modifier_keys":["shift"],"sentence":{"text":"I run daily."}}"#,
        )
        .unwrap();

        let event = LookupEvent::from(update);
        assert_eq!(event.word, "run");
        assert_eq!(event.context, "I run daily.");
        assert!(event.modifiers.contains("shift"));
    }

    #[test]
    fn content_update_without_sentence_has_empty_context() {
        let update: ContentUpdate = serde_json::from_str(r#"{"word":"run"}"#).unwrap();

        let event = LookupEvent::from(update);
        assert!(event.context.is_empty());
        assert!(event.modifiers.is_empty());
    }
}
