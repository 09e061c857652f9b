//! Vocabulary menu settings, the administrator path
//!
//! An administrator binds a vocabulary to a menu, sets the default parent and
//! link templates, and may then generate links for the whole term tree or
//! remove every generated link again.

use indexmap::IndexMap;

use crate::binding::{LinkTemplates, VocabularyBinding};
use crate::error::{Result, TaxonomyMenuError};
use crate::link::MenuParent;
use crate::lock::VocabularyLocks;
use crate::sync::{GenerateReport, Synchronizer};
use crate::term::{TermId, VocabularyId};

/// A menu links can be placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuInfo {
    /// Machine name
    pub name: String,

    /// Human-readable label
    pub label: String,
}

/// One selectable parent position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    /// Reference stored when the option is chosen
    pub value: MenuParent,

    /// Label shown to the user
    pub label: String,
}

/// Menus and parent positions known to the host.
pub trait MenuCatalog {
    /// All menus.
    fn menus(&self) -> Vec<MenuInfo>;

    /// Parent positions in `menu`, or in every menu when `None`.
    fn parent_options(&self, menu: Option<&str>) -> Vec<ParentOption>;
}

/// Fixed catalog of menus and parent positions.
#[derive(Debug, Clone, Default)]
pub struct StaticMenuCatalog {
    menus: IndexMap<String, String>,
    options: Vec<ParentOption>,
}

impl StaticMenuCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a menu. Its root becomes a parent option labelled `<label>`.
    pub fn with_menu(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        let label = label.into();
        self.options.push(ParentOption {
            value: MenuParent::root(name.clone()),
            label: format!("<{}>", label),
        });
        self.menus.insert(name, label);
        self
    }

    /// Add a parent position below an existing link.
    pub fn with_parent(mut self, value: MenuParent, label: impl Into<String>) -> Self {
        self.options.push(ParentOption {
            value,
            label: label.into(),
        });
        self
    }
}

impl MenuCatalog for StaticMenuCatalog {
    fn menus(&self) -> Vec<MenuInfo> {
        self.menus
            .iter()
            .map(|(name, label)| MenuInfo {
                name: name.clone(),
                label: label.clone(),
            })
            .collect()
    }

    fn parent_options(&self, menu: Option<&str>) -> Vec<ParentOption> {
        self.options
            .iter()
            .filter(|o| menu.map_or(true, |m| o.value.menu == m))
            .cloned()
            .collect()
    }
}

/// Settings form of one vocabulary, pre-filled from its binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularySettingsForm {
    /// Vocabulary being edited
    pub vocabulary_id: VocabularyId,

    /// Menus to choose from
    pub menus: Vec<MenuInfo>,

    /// Currently bound menu
    pub menu_name: Option<String>,

    /// Current default parent
    pub menu_parent: Option<MenuParent>,

    /// Parent positions across all menus
    pub parent_options: Vec<ParentOption>,

    /// Current link templates
    pub link_default: LinkTemplates,

    /// Whether the menu section starts expanded
    pub open: bool,
}

/// Submitted vocabulary settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularySettingsInput {
    /// Target menu; `None` unbinds the vocabulary
    pub menu_name: Option<String>,

    /// Default parent; the menu root when `None`
    pub menu_parent: Option<MenuParent>,

    /// Title template
    pub title: String,

    /// Description template
    pub description: String,

    /// Generate links for the whole term tree after saving
    pub run_generate: bool,
}

/// What a settings submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// Binding saved, optionally followed by generation
    Saved {
        /// Generation result when requested
        generated: Option<GenerateReport>,
    },

    /// Binding removed along with its links
    Cleared {
        /// Number of links deleted
        removed: usize,
    },
}

impl SettingsOutcome {
    /// Status message for the administrator, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            SettingsOutcome::Saved {
                generated: Some(report),
            } => Some(format!("Created {} menu items", report.created)),
            _ => None,
        }
    }
}

/// Administrator operations on vocabulary bindings.
pub struct VocabularyMenuAdmin<'a> {
    sync: Synchronizer<'a>,
    catalog: &'a dyn MenuCatalog,
    locks: &'a VocabularyLocks,
}

impl<'a> VocabularyMenuAdmin<'a> {
    /// Create the admin service.
    pub fn new(sync: Synchronizer<'a>, catalog: &'a dyn MenuCatalog, locks: &'a VocabularyLocks) -> Self {
        Self {
            sync,
            catalog,
            locks,
        }
    }

    /// Build the settings form of `vocabulary`.
    pub fn settings_form(&self, vocabulary: &VocabularyId) -> Result<VocabularySettingsForm> {
        let binding = self.sync.bindings().binding(vocabulary)?;
        Ok(VocabularySettingsForm {
            vocabulary_id: vocabulary.clone(),
            menus: self.catalog.menus(),
            menu_name: binding.as_ref().map(|b| b.menu_name.clone()),
            menu_parent: binding.as_ref().map(|b| b.menu_parent.clone()),
            parent_options: self.catalog.parent_options(None),
            link_default: binding
                .as_ref()
                .map(|b| b.link_default.clone())
                .unwrap_or_default(),
            open: binding.is_some(),
        })
    }

    /// Save submitted settings, then generate links if requested.
    ///
    /// Validation happens before anything is written. The existing link
    /// index survives a re-save.
    pub fn submit(
        &self,
        vocabulary: &VocabularyId,
        input: VocabularySettingsInput,
    ) -> Result<SettingsOutcome> {
        let Some(menu) = input.menu_name else {
            let removed = self.clear(vocabulary)?;
            return Ok(SettingsOutcome::Cleared { removed });
        };

        if !self.catalog.menus().iter().any(|m| m.name == menu) {
            return Err(TaxonomyMenuError::validation(
                "menu_name",
                format!("Menu '{}' does not exist", menu),
            ));
        }
        let parent = input.menu_parent.unwrap_or_else(|| MenuParent::root(menu.clone()));
        let allowed = self.catalog.parent_options(Some(&menu));
        if !allowed.iter().any(|o| o.value == parent) {
            return Err(TaxonomyMenuError::validation(
                "menu_parent",
                format!("'{}' is not a valid parent in menu '{}'", parent, menu),
            ));
        }

        let templates = LinkTemplates::new(input.title, input.description);
        let binding = match self.sync.bindings().binding(vocabulary)? {
            Some(mut existing) => {
                existing.menu_name = menu;
                existing.menu_parent = parent.clone();
                existing.link_default = templates.clone();
                existing
            }
            None => VocabularyBinding::new(vocabulary.clone(), menu, parent.clone())
                .with_templates(templates.clone()),
        };
        self.sync.bindings().put_binding(binding)?;
        self.sync.bindings().save()?;
        tracing::info!(%vocabulary, %parent, "saved vocabulary menu settings");

        let generated = if input.run_generate {
            let report = self.locks.with_lock(vocabulary, || {
                self.sync
                    .bulk_generate(vocabulary, &templates, &parent, TermId::ROOT)
            })??;
            Some(report)
        } else {
            None
        };
        Ok(SettingsOutcome::Saved { generated })
    }

    /// Delete every link generated for `vocabulary`.
    pub fn remove_menu_items(&self, vocabulary: &VocabularyId) -> Result<usize> {
        self.locks
            .with_lock(vocabulary, || self.sync.remove_all_links(vocabulary))?
    }

    /// Unbind `vocabulary`, deleting its links first.
    pub fn clear(&self, vocabulary: &VocabularyId) -> Result<usize> {
        let removed = self.remove_menu_items(vocabulary)?;
        self.sync.bindings().remove_binding(vocabulary)?;
        self.sync.bindings().save()?;
        tracing::info!(%vocabulary, removed, "cleared vocabulary menu binding");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkId;

    #[test]
    fn test_catalog_parent_options_filtered_by_menu() {
        let catalog = StaticMenuCatalog::new()
            .with_menu("main", "Main navigation")
            .with_menu("footer", "Footer")
            .with_parent(MenuParent::link("main", LinkId::new("3")), "-- About");

        assert_eq!(catalog.parent_options(None).len(), 3);
        let main = catalog.parent_options(Some("main"));
        assert_eq!(main.len(), 2);
        assert_eq!(main[0].label, "<Main navigation>");
    }

    #[test]
    fn test_outcome_message() {
        let saved = SettingsOutcome::Saved {
            generated: Some(GenerateReport {
                created: 3,
                empty_titles: vec![],
            }),
        };
        assert_eq!(saved.message().as_deref(), Some("Created 3 menu items"));
        assert_eq!(SettingsOutcome::Saved { generated: None }.message(), None);
        assert_eq!(SettingsOutcome::Cleared { removed: 2 }.message(), None);
    }
}
