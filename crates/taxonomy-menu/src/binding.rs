//! Vocabulary-to-menu bindings and the term-to-link index

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::link::{LinkId, MenuParent};
use crate::term::{TermId, VocabularyId};

/// Default title and description templates for generated links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplates {
    /// Title template
    #[serde(default)]
    pub title: String,

    /// Description template
    #[serde(default)]
    pub description: String,
}

impl LinkTemplates {
    /// Create templates.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Which menu link mirrors which term.
///
/// Holds at most one link per term. Insertion order is kept so removal walks
/// links in the order they were created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkIndex {
    links: IndexMap<TermId, LinkId>,
}

impl LinkIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link currently mirroring `term`.
    pub fn get(&self, term: TermId) -> Option<&LinkId> {
        self.links.get(&term)
    }

    /// Point `term` at `link`, returning the link it pointed at before.
    pub fn insert(&mut self, term: TermId, link: LinkId) -> Option<LinkId> {
        self.links.insert(term, link)
    }

    /// Drop the entry for `term`.
    pub fn remove(&mut self, term: TermId) -> Option<LinkId> {
        self.links.shift_remove(&term)
    }

    /// Iterate `(term, link)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &LinkId)> {
        self.links.iter().map(|(term, link)| (*term, link))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Per-vocabulary menu configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyBinding {
    /// Bound vocabulary
    pub vocabulary_id: VocabularyId,

    /// Target menu
    pub menu_name: String,

    /// Default parent for new links
    pub menu_parent: MenuParent,

    /// Default link templates
    #[serde(default)]
    pub link_default: LinkTemplates,

    /// Links created for terms of this vocabulary
    #[serde(default)]
    pub links: LinkIndex,
}

impl VocabularyBinding {
    /// Create a binding with empty templates and no links.
    pub fn new(
        vocabulary_id: impl Into<VocabularyId>,
        menu_name: impl Into<String>,
        menu_parent: MenuParent,
    ) -> Self {
        Self {
            vocabulary_id: vocabulary_id.into(),
            menu_name: menu_name.into(),
            menu_parent,
            link_default: LinkTemplates::default(),
            links: LinkIndex::new(),
        }
    }

    /// Set the default templates.
    pub fn with_templates(mut self, templates: LinkTemplates) -> Self {
        self.link_default = templates;
        self
    }
}

/// The whole persisted settings object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Bindings keyed by vocabulary
    #[serde(default)]
    pub menu_list: IndexMap<VocabularyId, VocabularyBinding>,
}
