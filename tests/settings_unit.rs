//! Unit tests for the global settings store and validation.

use ascii_noise::settings::{FontWeight, GlobalSettings, DEFAULT_CONTENT};
use ascii_noise::validate::{all_non_blank, non_blank, non_negative, single_line};
use ascii_noise::{NoiseError, SettingsStore, SettingsUpdate};
use std::sync::Arc;
use std::thread;

#[test]
fn test_blank_content_is_rejected_and_kept() {
    let store = SettingsStore::new();
    let result = store.configure(SettingsUpdate {
        content: Some(String::new()),
        ..Default::default()
    });
    assert!(matches!(result, Err(NoiseError::Validation)));
    assert_eq!(store.snapshot().content, DEFAULT_CONTENT);
}

#[test]
fn test_invalid_update_changes_nothing() {
    let store = SettingsStore::new();
    store
        .configure(SettingsUpdate {
            content: Some("FIRST".to_string()),
            ..Default::default()
        })
        .unwrap();
    let before = store.snapshot();

    // Valid fields alongside an invalid one must not be applied either
    let result = store.configure(SettingsUpdate {
        content: Some("SECOND".to_string()),
        font_weight: Some(FontWeight::Lighter),
        tick_interval_ms: Some(10),
        font_family: Some("\t".to_string()),
        ..Default::default()
    });
    assert!(result.is_err());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_multi_line_words_and_letters_are_rejected() {
    let store = SettingsStore::new();
    let words = store.configure(SettingsUpdate {
        words: Some(vec!["fine".to_string(), "a\nb".to_string()]),
        ..Default::default()
    });
    assert!(matches!(words, Err(NoiseError::Validation)));

    let letters = store.configure(SettingsUpdate {
        letters: Some("01\n".to_string()),
        ..Default::default()
    });
    assert!(matches!(letters, Err(NoiseError::Validation)));
    assert_eq!(store.snapshot(), GlobalSettings::default());
}

#[test]
fn test_empty_update_is_a_no_op() {
    let store = SettingsStore::new();
    store.configure(SettingsUpdate::default()).unwrap();
    assert_eq!(store.snapshot(), GlobalSettings::default());
}

#[test]
fn test_valid_update_merges() {
    let store = SettingsStore::new();
    store
        .configure(SettingsUpdate {
            words: Some(vec!["glitch".to_string()]),
            font_weight: Some(FontWeight::W400),
            ..Default::default()
        })
        .unwrap();
    let settings = store.snapshot();
    assert_eq!(settings.words, vec!["glitch".to_string()]);
    assert_eq!(settings.font_weight, FontWeight::W400);
    assert_eq!(settings.content, DEFAULT_CONTENT);
}

#[test]
fn test_clones_share_state() {
    let store = SettingsStore::new();
    let other = store.clone();
    other
        .configure(SettingsUpdate {
            letters: Some("01".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(store.snapshot().letters, "01");
}

#[test]
fn test_concurrent_readers_only_see_valid_snapshots() {
    let store = Arc::new(SettingsStore::new());
    let mut handles = Vec::new();

    for i in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for n in 0..200 {
                let letters = if (i + n) % 2 == 0 { "ab".to_string() } else { " ".to_string() };
                let _ = store.configure(SettingsUpdate {
                    letters: Some(letters),
                    content: Some(format!("writer {}", i)),
                    ..Default::default()
                });
            }
        }));
    }
    for _ in 0..2 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                assert!(store.snapshot().is_valid());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.snapshot().letters, "ab");
}

#[test]
fn test_validator_predicates() {
    assert!(non_blank("x"));
    assert!(!non_blank("   "));
    assert!(all_non_blank(&["a", "b"]));
    assert!(!all_non_blank(&["a", ""]));
    assert!(non_negative(0.0));
    assert!(!non_negative(-1.0));
    assert!(single_line("word"));
    assert!(!single_line("two\nlines"));
}
