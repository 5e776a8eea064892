/*!
 * Tests for the vocabulary notebook and its persistence
 */

use anyhow::Result;
use lingoplay::database::{StateStore, SENTENCES_KEY, VOCAB_KEY};
use lingoplay::lookup_service::WordAnalysis;
use lingoplay::notebook::{Notebook, SavedSentence, SavedWord};
use lingoplay::subtitle_processor::Subtitle;

fn analysis(word: &str) -> WordAnalysis {
    WordAnalysis {
        definition: format!("meaning of {}", word),
        translation: format!("[zh] {}", word),
        usage_example: format!("Use {}.", word),
    }
}

#[test]
fn test_saveWord_shouldCopyAnalysisAndContext() {
    let mut notebook = Notebook::default();

    assert!(notebook.save_word("run", &analysis("run"), "We run home."));

    let saved = &notebook.words()[0];
    assert_eq!(saved.word, "run");
    assert_eq!(saved.definition, "meaning of run");
    assert_eq!(saved.translation, "[zh] run");
    assert_eq!(saved.context, "We run home.");
    assert!(!saved.id.is_empty());
    assert!(saved.timestamp > 0);
}

#[test]
fn test_deleteWord_shouldRemoveById() {
    let mut notebook = Notebook::default();
    notebook.save_word("run", &analysis("run"), "");
    let id = notebook.words()[0].id.clone();

    assert!(notebook.delete_word(&id));
    assert!(!notebook.delete_word(&id));
    assert!(!notebook.is_word_saved("run"));
}

#[test]
fn test_toggleBookmark_shouldStoreBothLanguagesNewestFirst() {
    let mut notebook = Notebook::default();

    notebook.toggle_bookmark(&Subtitle::new("s1", 0.0, 1.0, "Hello", "你好"));
    notebook.toggle_bookmark(&Subtitle::new("s2", 1.0, 2.0, "Bye", "再见"));

    let ids: Vec<&str> = notebook.sentences().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s1"]);
    assert_eq!(notebook.sentences()[1].text_secondary, "你好");
}

#[test]
fn test_saveAndLoad_shouldRoundTripThroughStore() -> Result<()> {
    let store = StateStore::new_in_memory()?;
    let mut notebook = Notebook::default();
    notebook.save_word("run", &analysis("run"), "We run home.");
    notebook.toggle_bookmark(&Subtitle::new("s1", 0.0, 1.0, "Hello", "你好"));
    notebook.set_note("s1", "greeting");

    notebook.save_words(&store)?;
    notebook.save_sentences(&store)?;

    let loaded = Notebook::load(&store);
    assert_eq!(loaded, notebook);
    Ok(())
}

#[test]
fn test_load_withCorruptList_shouldFallBackPerList() -> Result<()> {
    let store = StateStore::new_in_memory()?;
    store.put_raw(VOCAB_KEY, "{ this is not json")?;
    let sentences = vec![SavedSentence {
        id: "s1".to_string(),
        text_primary: "Hello".to_string(),
        text_secondary: "你好".to_string(),
        note: None,
        timestamp: 1,
    }];
    store.save(SENTENCES_KEY, &sentences)?;

    let loaded = Notebook::load(&store);

    assert!(loaded.words().is_empty());
    assert_eq!(loaded.sentences(), sentences.as_slice());
    Ok(())
}

#[test]
fn test_savedWord_shouldSerializeWithoutNote() -> Result<()> {
    let word = SavedWord {
        id: "w1".to_string(),
        word: "run".to_string(),
        definition: "d".to_string(),
        translation: "t".to_string(),
        context: "c".to_string(),
        timestamp: 42,
    };
    let sentence = SavedSentence {
        id: "s1".to_string(),
        text_primary: "p".to_string(),
        text_secondary: "s".to_string(),
        note: None,
        timestamp: 42,
    };

    let word_json: serde_json::Value = serde_json::to_value(&word)?;
    let sentence_json = serde_json::to_string(&sentence)?;

    assert_eq!(word_json["timestamp"], 42);
    assert!(!sentence_json.contains("note"));
    Ok(())
}
