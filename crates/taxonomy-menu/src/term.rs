//! Taxonomy terms and the term tree provider

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxonomyMenuError};

/// Machine name of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyId(String);

impl VocabularyId {
    /// Create a vocabulary id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VocabularyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for VocabularyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Numeric term id. `0` is the virtual root of every vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl TermId {
    /// Parent id of top-level terms.
    pub const ROOT: TermId = TermId(0);

    /// Whether this is the virtual root.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TermId {
    fn from(id: u64) -> Self {
        TermId(id)
    }
}

/// A node of a vocabulary's term hierarchy.
///
/// Owned by the taxonomy subsystem; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermNode {
    /// Term id
    pub id: TermId,

    /// Vocabulary the term belongs to
    pub vocabulary_id: VocabularyId,

    /// Parent term, [`TermId::ROOT`] for top-level terms
    pub parent: TermId,

    /// Depth in the tree, `0` for top-level terms
    pub depth: u32,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Sibling ordering weight
    #[serde(default)]
    pub weight: i32,
}

impl TermNode {
    /// Create a top-level term.
    pub fn new(
        vocabulary_id: impl Into<VocabularyId>,
        id: u64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: TermId(id),
            vocabulary_id: vocabulary_id.into(),
            parent: TermId::ROOT,
            depth: 0,
            name: name.into(),
            description: String::new(),
            weight: 0,
        }
    }

    /// Set the parent term and depth.
    pub fn with_parent(mut self, parent: TermId, depth: u32) -> Self {
        self.parent = parent;
        self.depth = depth;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the sibling weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Canonical URI a menu link uses to point at this term.
    pub fn link_uri(&self) -> String {
        format!("entity:taxonomy_term/{}", self.id)
    }
}

/// Provider of a vocabulary's term hierarchy.
pub trait TermTree {
    /// Load the direct children of `parent` within `vocabulary`.
    ///
    /// Only one level is returned, already in the tree's display order.
    fn children(&self, vocabulary: &VocabularyId, parent: TermId) -> Result<Vec<TermNode>>;
}

/// In-memory term tree.
///
/// Siblings are kept ordered by weight, then name.
#[derive(Debug, Clone, Default)]
pub struct MemoryTermTree {
    terms: Vec<TermNode>,
}

impl MemoryTermTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term with weight `0` under `parent`.
    pub fn insert(
        &mut self,
        vocabulary: impl Into<VocabularyId>,
        id: u64,
        parent: TermId,
        name: impl Into<String>,
    ) -> Result<TermNode> {
        let term = TermNode::new(vocabulary, id, name);
        self.insert_term(term.with_parent(parent, 0))
    }

    /// Insert a fully built term. Depth is recomputed from the parent.
    ///
    /// Rejects the root id, duplicate ids and terms that are their own parent.
    pub fn insert_term(&mut self, mut term: TermNode) -> Result<TermNode> {
        if term.id.is_root() {
            return Err(TaxonomyMenuError::invalid_term(
                term.id,
                "id 0 is reserved for the root",
            ));
        }
        if term.parent == term.id {
            return Err(TaxonomyMenuError::invalid_term(
                term.id,
                "term cannot be its own parent",
            ));
        }
        if self.get(term.id).is_some() {
            return Err(TaxonomyMenuError::invalid_term(term.id, "duplicate term id"));
        }
        term.depth = match self.get(term.parent) {
            Some(parent) if !term.parent.is_root() => parent.depth + 1,
            _ => 0,
        };
        self.terms.push(term.clone());
        Ok(term)
    }

    /// Look up a term by id.
    pub fn get(&self, id: TermId) -> Option<&TermNode> {
        self.terms.iter().find(|t| t.id == id)
    }

    /// Remove a term. Its children are left in place.
    pub fn remove(&mut self, id: TermId) -> Option<TermNode> {
        let pos = self.terms.iter().position(|t| t.id == id)?;
        Some(self.terms.remove(pos))
    }

    /// Total number of terms across all vocabularies.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the tree holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermTree for MemoryTermTree {
    fn children(&self, vocabulary: &VocabularyId, parent: TermId) -> Result<Vec<TermNode>> {
        let mut children: Vec<TermNode> = self
            .terms
            .iter()
            .filter(|t| &t.vocabulary_id == vocabulary && t.parent == parent)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.name.cmp(&b.name)));
        Ok(children)
    }
}
