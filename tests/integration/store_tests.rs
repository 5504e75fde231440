//! Integration tests for rule persistence on disk

use std::sync::Arc;

use tempfile::TempDir;
use token_detector::colour::Colour;
use token_detector::store::PREF_KEY;
use token_detector::{FilePreferences, Preferences, Rule, RuleStore, RulesEditor};

fn file_store(dir: &TempDir) -> (RuleStore, Arc<FilePreferences>) {
    let prefs = Arc::new(FilePreferences::new(dir.path().join("preferences.toml")));
    (RuleStore::new(prefs.clone()), prefs)
}

#[test]
fn test_first_run_gets_defaults() {
    let dir = TempDir::new().unwrap();
    let (store, _) = file_store(&dir);
    let rules = store.load_all();
    assert_eq!(rules, RuleStore::defaults());
    assert!(rules.iter().all(|r| r.enabled));
}

#[test]
fn test_rules_survive_restart() {
    let dir = TempDir::new().unwrap();
    let rules = vec![
        Rule::new(true, "PASETO token", Colour::Green, "v[0-9]\\.(local|public)\\."),
        Rule::new(false, "secret", Colour::Gray, "secret"),
        Rule::new(true, "quote \" and newline \n", Colour::Pink, "a\"b"),
    ];

    {
        let (store, _) = file_store(&dir);
        store.save_all(&rules).unwrap();
    }

    let (store, _) = file_store(&dir);
    assert_eq!(store.load_all(), rules);
    assert_eq!(store.load_enabled().len(), 2);
}

#[test]
fn test_corrupt_value_recovers_defaults() {
    let dir = TempDir::new().unwrap();
    let (store, prefs) = file_store(&dir);
    prefs.set_string(PREF_KEY, "rO0ABXNyABNqYXZhLnV0aWwuQXJyYXlMaXN0eIHSHZnHYZ0").unwrap();
    assert_eq!(store.load_all(), RuleStore::defaults());
}

#[test]
fn test_other_preference_keys_untouched() {
    let dir = TempDir::new().unwrap();
    let (store, prefs) = file_store(&dir);
    prefs.set_string("markRequests", "true").unwrap();
    store.save_all(&[]).unwrap();
    assert_eq!(prefs.get_string("markRequests"), Some("true".to_string()));
    assert!(store.load_all().is_empty());
}

#[test]
fn test_editor_session() {
    let dir = TempDir::new().unwrap();
    let (store, _) = file_store(&dir);

    let mut editor = RulesEditor::load(&store);
    editor.set_enabled(&[1], false).unwrap();
    let row = editor.add_rule();
    editor.set_regex(row, "(?i)x-auth-token").unwrap();
    editor.set_colour(row, Colour::Blue).unwrap();
    editor.save(&store).unwrap();

    let reloaded = store.load_all();
    assert_eq!(reloaded.len(), 4);
    assert!(!reloaded[1].enabled);
    assert_eq!(reloaded[3].colour, Colour::Blue);

    let enabled: Vec<String> = store.load_enabled().into_iter().map(|r| r.name).collect();
    assert_eq!(enabled, vec!["LTPA2 token", "PASETO token", "New rule"]);
}
