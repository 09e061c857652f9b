//! JSON settings store tests

use pretty_assertions::assert_eq;
use taxonomy_menu::*;

#[test]
fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut terms = MemoryTermTree::new();
    let red = terms.insert("colors", 1, TermId::ROOT, "red").unwrap();
    terms.insert("colors", 2, red.id, "crimson").unwrap();
    let links = MemoryLinkStore::new();
    let renderer = TokenRenderer::new();

    let expected = {
        let store = JsonSettingsStore::open(&path).unwrap();
        store
            .put_binding(VocabularyBinding::new("colors", "main", MenuParent::root("main")))
            .unwrap();
        let sync = Synchronizer::new(&store, &links, &terms, &renderer);
        sync.bulk_generate(
            &"colors".into(),
            &LinkTemplates::new("[term:name]", ""),
            &MenuParent::root("main"),
            TermId::ROOT,
        )
        .unwrap();
        store.snapshot().unwrap()
    };

    let reopened = JsonSettingsStore::open(&path).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), expected);
    let binding = reopened.binding(&"colors".into()).unwrap().unwrap();
    assert_eq!(binding.links.len(), 2);
}

#[test]
fn test_unsaved_changes_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = JsonSettingsStore::open(&path).unwrap();
    store
        .put_binding(VocabularyBinding::new("tags", "main", MenuParent::root("main")))
        .unwrap();
    assert!(!path.exists());

    store.save().unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_settings_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
            "menu_list": {
                "tags": {
                    "vocabulary_id": "tags",
                    "menu_name": "main",
                    "menu_parent": "main:7",
                    "link_default": { "title": "[term:name]" },
                    "links": { "3": "11" }
                }
            }
        }"#,
    )
    .unwrap();

    let store = JsonSettingsStore::open(&path).unwrap();
    let binding = store.binding(&"tags".into()).unwrap().unwrap();
    assert_eq!(binding.menu_parent, MenuParent::link("main", LinkId::new("7")));
    assert_eq!(binding.link_default.description, "");
    assert_eq!(binding.links.get(TermId(3)), Some(&LinkId::new("11")));
}

#[test]
fn test_remove_binding_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = JsonSettingsStore::open(&path).unwrap();
    store
        .put_binding(VocabularyBinding::new("tags", "main", MenuParent::root("main")))
        .unwrap();
    store.save().unwrap();
    store.remove_binding(&"tags".into()).unwrap();
    store.save().unwrap();

    let reopened = JsonSettingsStore::open(&path).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), Settings::default());
}
