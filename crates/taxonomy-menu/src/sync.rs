//! Menu link synchronizer
//!
//! Keeps menu links in step with taxonomy terms. Every operation reads the
//! vocabulary binding, changes at most one link, and writes the binding back
//! before moving on, so the link index always matches the links that exist.
//!
//! # Per-term lifecycle
//!
//! ```text
//! NoLink ──create──▶ Linked ──delete──▶ NoLink
//!                    │    ▲
//!                    └────┘ create (replace)
//! ```
//!
//! # Bulk generation
//!
//! [`Synchronizer::bulk_generate`] walks the term tree depth-first in
//! pre-order, one level at a time. Each term's link becomes the parent of its
//! children's links, so the menu mirrors the term hierarchy.

use crate::binding::{LinkTemplates, VocabularyBinding};
use crate::config::BindingStore;
use crate::error::{Result, TaxonomyMenuError};
use crate::link::{LinkId, LinkStore, MenuParent, NewMenuLink};
use crate::template::TemplateRenderer;
use crate::term::{TermId, TermNode, TermTree, VocabularyId};

/// Values for a term's menu link.
///
/// `title` and `description` are templates; they are rendered with the term
/// before the link is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValues {
    /// Title template
    pub title: String,

    /// Description template
    pub description: String,

    /// Where the link goes
    pub menu_parent: MenuParent,

    /// Ordering among siblings
    pub weight: i32,

    /// Whether the link is shown
    pub enabled: bool,

    /// Whether children are always shown
    pub expanded: bool,
}

impl LinkValues {
    /// Enabled values with zero weight.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        menu_parent: MenuParent,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            menu_parent,
            weight: 0,
            enabled: true,
            expanded: false,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set whether children are always shown.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// Current values of a term's link, for pre-filling an edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefaults {
    /// Link id
    pub id: LinkId,

    /// Stored title
    pub title: String,

    /// Stored description
    pub description: String,

    /// Stored weight
    pub weight: i32,

    /// Whether children are always shown
    pub expanded: bool,

    /// Where the link sits
    pub menu_parent: MenuParent,

    /// Reference children of the link use
    pub link_ref: MenuParent,
}

/// Outcome of a bulk generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Number of links created
    pub created: usize,

    /// Terms whose title rendered empty
    pub empty_titles: Vec<TermId>,
}

/// One level of the bulk generation worklist.
struct Frame {
    children: std::vec::IntoIter<TermNode>,
    parent: MenuParent,
}

/// Creates, replaces and deletes the menu links that mirror terms.
///
/// All collaborators are passed in; nothing is looked up globally.
#[derive(Clone, Copy)]
pub struct Synchronizer<'a> {
    bindings: &'a dyn BindingStore,
    links: &'a dyn LinkStore,
    terms: &'a dyn TermTree,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Synchronizer<'a> {
    /// Create a synchronizer over the given collaborators.
    pub fn new(
        bindings: &'a dyn BindingStore,
        links: &'a dyn LinkStore,
        terms: &'a dyn TermTree,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            bindings,
            links,
            terms,
            renderer,
        }
    }

    /// The binding store.
    pub fn bindings(&self) -> &'a dyn BindingStore {
        self.bindings
    }

    /// The link store.
    pub fn links(&self) -> &'a dyn LinkStore {
        self.links
    }

    /// The template renderer.
    pub fn renderer(&self) -> &'a dyn TemplateRenderer {
        self.renderer
    }

    /// Load the binding of `vocabulary`, failing if it is not bound.
    pub fn require_binding(&self, vocabulary: &VocabularyId) -> Result<VocabularyBinding> {
        self.bindings
            .binding(vocabulary)?
            .ok_or_else(|| TaxonomyMenuError::MissingBinding(vocabulary.clone()))
    }

    /// Create the menu link of `term`, replacing any existing one.
    ///
    /// Returns the new link's stable reference, which is the parent reference
    /// for links of the term's children.
    pub fn create_link_for_term(&self, term: &TermNode, values: &LinkValues) -> Result<MenuParent> {
        let rendered = LinkValues {
            title: self.renderer.render(&values.title, term)?,
            description: self.renderer.render(&values.description, term)?,
            ..values.clone()
        };
        self.store_link(term, &rendered)
    }

    /// Id of the link currently mirroring `term`.
    pub fn link_id(&self, term: &TermNode) -> Result<Option<LinkId>> {
        Ok(self
            .bindings
            .binding(&term.vocabulary_id)?
            .and_then(|b| b.links.get(term.id).cloned()))
    }

    /// Store already rendered values as the link of `term`.
    fn store_link(&self, term: &TermNode, values: &LinkValues) -> Result<MenuParent> {
        let parent = self.replacement_parent(term, &values.menu_parent)?;

        // Replace, never append: at most one link per term.
        self.delete_link_for_term(term)?;

        let mut binding = self.require_binding(&term.vocabulary_id)?;
        let mut link = NewMenuLink::new(&parent, values.title.clone(), term.link_uri());
        link.description = values.description.clone();
        link.weight = values.weight;
        link.enabled = values.enabled;
        link.expanded = values.expanded;

        let record = self.links.create(link)?;
        tracing::debug!(
            vocabulary = %term.vocabulary_id,
            term = %term.id,
            link = %record.id,
            %parent,
            "created menu link"
        );

        binding.links.insert(term.id, record.id.clone());
        self.bindings.put_binding(binding)?;
        self.bindings.save()?;
        Ok(record.self_reference())
    }

    /// Parent for the replacement link of `term`.
    ///
    /// The term's current link is deleted before its replacement is created,
    /// so it cannot be the parent. A request for it falls back to where the
    /// current link sits.
    fn replacement_parent(&self, term: &TermNode, requested: &MenuParent) -> Result<MenuParent> {
        let Some(own) = self.link_id(term)? else {
            return Ok(requested.clone());
        };
        if requested.parent.as_ref() != Some(&own) {
            return Ok(requested.clone());
        }
        let fallback = match self.links.load(&own)? {
            Some(record) => record.parent_reference(),
            None => self.require_binding(&term.vocabulary_id)?.menu_parent,
        };
        tracing::warn!(
            vocabulary = %term.vocabulary_id,
            term = %term.id,
            %requested,
            %fallback,
            "menu link cannot be its own parent"
        );
        Ok(fallback)
    }

    /// Delete the menu link of `term`, if any.
    ///
    /// Returns `true` if a link record was deleted. Calling this again is a
    /// no-op; a record that is already gone only clears the index entry.
    pub fn delete_link_for_term(&self, term: &TermNode) -> Result<bool> {
        let Some(mut binding) = self.bindings.binding(&term.vocabulary_id)? else {
            return Ok(false);
        };
        let Some(link) = binding.links.get(term.id).cloned() else {
            return Ok(false);
        };

        let deleted = self.links.delete(&link)?;
        if deleted {
            tracing::debug!(vocabulary = %term.vocabulary_id, term = %term.id, %link, "deleted menu link");
        } else {
            tracing::debug!(vocabulary = %term.vocabulary_id, term = %term.id, %link, "pruned stale link entry");
        }

        binding.links.remove(term.id);
        self.bindings.put_binding(binding)?;
        self.bindings.save()?;
        Ok(deleted)
    }

    /// Current values of the link of `term`, for pre-filling a form.
    ///
    /// Returns `None` if the term has no link. An index entry whose record no
    /// longer exists is pruned.
    pub fn link_defaults(&self, term: &TermNode) -> Result<Option<LinkDefaults>> {
        let Some(binding) = self.bindings.binding(&term.vocabulary_id)? else {
            return Ok(None);
        };
        let Some(link) = binding.links.get(term.id) else {
            return Ok(None);
        };

        match self.links.load(link)? {
            Some(record) => Ok(Some(LinkDefaults {
                id: record.id.clone(),
                title: record.fields.title.clone(),
                description: record.fields.description.clone(),
                weight: record.fields.weight,
                expanded: record.fields.expanded,
                menu_parent: record.parent_reference(),
                link_ref: record.self_reference(),
            })),
            None => {
                tracing::warn!(vocabulary = %term.vocabulary_id, term = %term.id, %link, "link index entry points at a missing link");
                self.delete_link_for_term(term)?;
                Ok(None)
            }
        }
    }

    /// Generate links for every term below `parent_term`.
    ///
    /// Top-level terms of the walk go under `root_parent`; every other term
    /// goes under its parent term's new link. Siblings keep the tree's order.
    ///
    /// Titles are not validated here. Terms whose title renders empty still
    /// get a link and are listed in the report. A failure stops the walk and
    /// leaves the links created so far in place.
    pub fn bulk_generate(
        &self,
        vocabulary: &VocabularyId,
        templates: &LinkTemplates,
        root_parent: &MenuParent,
        parent_term: TermId,
    ) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();
        let mut stack = vec![Frame {
            children: self.terms.children(vocabulary, parent_term)?.into_iter(),
            parent: root_parent.clone(),
        }];

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame
                    .children
                    .next()
                    .map(|term| (term, frame.parent.clone())),
                None => break,
            };
            let Some((term, parent)) = next else {
                stack.pop();
                continue;
            };

            let values = LinkValues::new(
                self.renderer.render(&templates.title, &term)?,
                self.renderer.render(&templates.description, &term)?,
                parent,
            );
            if values.title.trim().is_empty() {
                tracing::warn!(%vocabulary, term = %term.id, "generated menu link has an empty title");
                report.empty_titles.push(term.id);
            }

            let link_ref = self.store_link(&term, &values)?;
            report.created += 1;

            stack.push(Frame {
                children: self.terms.children(vocabulary, term.id)?.into_iter(),
                parent: link_ref,
            });
        }

        tracing::info!(%vocabulary, created = report.created, "generated menu links");
        Ok(report)
    }

    /// Delete every link generated for `vocabulary`.
    ///
    /// Each index entry is cleared and saved right after its link is deleted.
    /// Returns the number of link records deleted.
    pub fn remove_all_links(&self, vocabulary: &VocabularyId) -> Result<usize> {
        let Some(binding) = self.bindings.binding(vocabulary)? else {
            return Ok(0);
        };
        let entries: Vec<(TermId, LinkId)> = binding
            .links
            .iter()
            .map(|(term, link)| (term, link.clone()))
            .collect();

        let mut removed = 0;
        for (term, link) in entries {
            if self.links.delete(&link)? {
                removed += 1;
            } else {
                tracing::warn!(%vocabulary, %term, %link, "indexed menu link was already gone");
            }
            let mut current = self.require_binding(vocabulary)?;
            current.links.remove(term);
            self.bindings.put_binding(current)?;
            self.bindings.save()?;
        }

        tracing::info!(%vocabulary, removed, "removed menu links");
        Ok(removed)
    }

    /// Drop the link of a term that is being deleted.
    pub fn term_deleted(&self, term: &TermNode) -> Result<bool> {
        self.delete_link_for_term(term)
    }
}
