/*!
 * Vocabulary notebook: saved words and bookmarked sentences.
 *
 * Both lists are kept newest first, the order they are shown in.
 */

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::database::{StateStore, SENTENCES_KEY, VOCAB_KEY};
use crate::lookup_service::WordAnalysis;
use crate::subtitle_processor::{generate_id, Subtitle};

/// A looked-up word the learner kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWord {
    pub id: String,
    pub word: String,
    pub definition: String,
    pub translation: String,
    /// Sentence the word was looked up in
    pub context: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A bookmarked subtitle line; `id` is the subtitle's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSentence {
    pub id: String,
    pub text_primary: String,
    pub text_secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notebook {
    words: Vec<SavedWord>,
    sentences: Vec<SavedSentence>,
}

impl Notebook {
    pub fn new(words: Vec<SavedWord>, sentences: Vec<SavedSentence>) -> Self {
        Self { words, sentences }
    }

    /// Load both lists from the store; each falls back to empty on its own
    pub fn load(store: &StateStore) -> Self {
        Self {
            words: store.load_or_default(VOCAB_KEY),
            sentences: store.load_or_default(SENTENCES_KEY),
        }
    }

    pub fn save_words(&self, store: &StateStore) -> anyhow::Result<()> {
        store.save(VOCAB_KEY, &self.words)
    }

    pub fn save_sentences(&self, store: &StateStore) -> anyhow::Result<()> {
        store.save(SENTENCES_KEY, &self.sentences)
    }

    pub fn words(&self) -> &[SavedWord] {
        &self.words
    }

    pub fn sentences(&self) -> &[SavedSentence] {
        &self.sentences
    }

    /// Keep a looked-up word. Returns false if the word is already saved.
    pub fn save_word(&mut self, word: &str, analysis: &WordAnalysis, context: &str) -> bool {
        if self.is_word_saved(word) {
            debug!("Word '{}' already in notebook", word);
            return false;
        }

        self.words.insert(
            0,
            SavedWord {
                id: generate_id(),
                word: word.to_string(),
                definition: analysis.definition.clone(),
                translation: analysis.translation.clone(),
                context: context.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        true
    }

    pub fn is_word_saved(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.word == word)
    }

    pub fn delete_word(&mut self, id: &str) -> bool {
        let before = self.words.len();
        self.words.retain(|w| w.id != id);
        self.words.len() != before
    }

    /// Bookmark `subtitle`, or remove its bookmark. Returns whether it is now bookmarked.
    pub fn toggle_bookmark(&mut self, subtitle: &Subtitle) -> bool {
        if self.delete_sentence(&subtitle.id) {
            return false;
        }

        self.sentences.insert(
            0,
            SavedSentence {
                id: subtitle.id.clone(),
                text_primary: subtitle.text_primary.clone(),
                text_secondary: subtitle.text_secondary.clone(),
                note: None,
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        true
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.sentences.iter().any(|s| s.id == id)
    }

    pub fn delete_sentence(&mut self, id: &str) -> bool {
        let before = self.sentences.len();
        self.sentences.retain(|s| s.id != id);
        self.sentences.len() != before
    }

    /// Attach a note to a bookmark; an empty note clears it
    pub fn set_note(&mut self, id: &str, note: &str) -> bool {
        match self.sentences.iter_mut().find(|s| s.id == id) {
            Some(sentence) => {
                let note = note.trim();
                sentence.note = (!note.is_empty()).then(|| note.to_string());
                true
            }
            None => false,
        }
    }
}
