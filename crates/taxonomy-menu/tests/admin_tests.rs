//! Vocabulary settings tests

use pretty_assertions::assert_eq;
use taxonomy_menu::*;

struct Fixture {
    bindings: MemoryBindingStore,
    links: MemoryLinkStore,
    terms: MemoryTermTree,
    renderer: TokenRenderer,
    catalog: StaticMenuCatalog,
    locks: VocabularyLocks,
}

impl Fixture {
    fn new() -> Self {
        let mut terms = MemoryTermTree::new();
        let red = terms.insert("colors", 1, TermId::ROOT, "red").unwrap();
        terms.insert("colors", 2, red.id, "crimson").unwrap();
        terms.insert("colors", 3, TermId::ROOT, "blue").unwrap();
        Self {
            bindings: MemoryBindingStore::new(),
            links: MemoryLinkStore::new(),
            terms,
            renderer: TokenRenderer::new(),
            catalog: StaticMenuCatalog::new()
                .with_menu("main", "Main navigation")
                .with_menu("footer", "Footer")
                .with_parent(MenuParent::link("main", LinkId::new("about")), "-- About"),
            locks: VocabularyLocks::new(),
        }
    }

    fn admin(&self) -> VocabularyMenuAdmin<'_> {
        let sync = Synchronizer::new(&self.bindings, &self.links, &self.terms, &self.renderer);
        VocabularyMenuAdmin::new(sync, &self.catalog, &self.locks)
    }

    fn binding(&self) -> Option<VocabularyBinding> {
        self.bindings.binding(&"colors".into()).unwrap()
    }
}

fn input(menu: &str, generate: bool) -> VocabularySettingsInput {
    VocabularySettingsInput {
        menu_name: Some(menu.to_string()),
        menu_parent: None,
        title: "[term:name]".to_string(),
        description: "All about [term:name]".to_string(),
        run_generate: generate,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Settings Form
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_settings_form_unbound() {
    let fx = Fixture::new();
    let form = fx.admin().settings_form(&"colors".into()).unwrap();

    assert!(!form.open);
    assert_eq!(form.menu_name, None);
    assert_eq!(form.menus.len(), 2);
    assert_eq!(form.parent_options.len(), 3);
    assert_eq!(form.link_default, LinkTemplates::default());
}

#[test]
fn test_settings_form_bound() {
    let fx = Fixture::new();
    let admin = fx.admin();
    admin.submit(&"colors".into(), input("footer", false)).unwrap();

    let form = admin.settings_form(&"colors".into()).unwrap();
    assert!(form.open);
    assert_eq!(form.menu_name.as_deref(), Some("footer"));
    assert_eq!(form.menu_parent, Some(MenuParent::root("footer")));
    assert_eq!(form.link_default.title, "[term:name]");
}

// ═══════════════════════════════════════════════════════════════════════
// Submission
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_submit_saves_binding_without_generating() {
    let fx = Fixture::new();
    let outcome = fx.admin().submit(&"colors".into(), input("main", false)).unwrap();

    assert_eq!(outcome, SettingsOutcome::Saved { generated: None });
    assert_eq!(outcome.message(), None);
    assert!(fx.links.is_empty());

    let binding = fx.binding().unwrap();
    assert_eq!(binding.menu_name, "main");
    assert_eq!(binding.menu_parent, MenuParent::root("main"));
    assert_eq!(
        binding.link_default,
        LinkTemplates::new("[term:name]", "All about [term:name]")
    );
    assert!(fx.bindings.save_count() >= 1);
}

#[test]
fn test_submit_with_generate_reports_count() {
    let fx = Fixture::new();
    let mut settings = input("main", true);
    settings.menu_parent = Some(MenuParent::link("main", LinkId::new("about")));
    let outcome = fx.admin().submit(&"colors".into(), settings).unwrap();

    assert_eq!(outcome.message().as_deref(), Some("Created 3 menu items"));
    assert_eq!(fx.links.len(), 3);

    let binding = fx.binding().unwrap();
    assert_eq!(binding.links.len(), 3);
    let red_link = fx.links.load(binding.links.get(TermId(1)).unwrap()).unwrap().unwrap();
    assert_eq!(red_link.fields.description, "All about red");
    assert_eq!(
        red_link.parent_reference(),
        MenuParent::link("main", LinkId::new("about"))
    );
}

#[test]
fn test_resubmit_keeps_link_index() {
    let fx = Fixture::new();
    let admin = fx.admin();
    admin.submit(&"colors".into(), input("main", true)).unwrap();

    let mut changed = input("main", false);
    changed.title = "Color: [term:name]".to_string();
    admin.submit(&"colors".into(), changed).unwrap();

    let binding = fx.binding().unwrap();
    assert_eq!(binding.links.len(), 3);
    assert_eq!(binding.link_default.title, "Color: [term:name]");
}

#[test]
fn test_unknown_menu_rejected() {
    let fx = Fixture::new();
    let err = fx
        .admin()
        .submit(&"colors".into(), input("sidebar", true))
        .unwrap_err();

    assert!(matches!(err, TaxonomyMenuError::Validation { ref field, .. } if field == "menu_name"));
    assert_eq!(fx.binding(), None);
    assert!(fx.links.is_empty());
}

#[test]
fn test_parent_from_other_menu_rejected() {
    let fx = Fixture::new();
    let mut settings = input("footer", true);
    settings.menu_parent = Some(MenuParent::link("main", LinkId::new("about")));
    let err = fx.admin().submit(&"colors".into(), settings).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(fx.binding(), None);
}

// ═══════════════════════════════════════════════════════════════════════
// Removal
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_remove_menu_items() {
    let fx = Fixture::new();
    let admin = fx.admin();
    admin.submit(&"colors".into(), input("main", true)).unwrap();

    assert_eq!(admin.remove_menu_items(&"colors".into()).unwrap(), 3);
    assert!(fx.links.is_empty());
    // The binding itself stays.
    let binding = fx.binding().unwrap();
    assert!(binding.links.is_empty());
    assert_eq!(binding.menu_name, "main");
}

#[test]
fn test_clearing_menu_unbinds_vocabulary() {
    let fx = Fixture::new();
    let admin = fx.admin();
    admin.submit(&"colors".into(), input("main", true)).unwrap();

    let outcome = admin
        .submit(&"colors".into(), VocabularySettingsInput::default())
        .unwrap();

    assert_eq!(outcome, SettingsOutcome::Cleared { removed: 3 });
    assert!(fx.links.is_empty());
    assert_eq!(fx.binding(), None);
}
