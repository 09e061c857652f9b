//! Per-term menu settings, the editor path
//!
//! The term edit form carries a "Provide a menu link" section. Ticking it
//! creates (or replaces) the term's link from the submitted values; clearing
//! it deletes the link.

use crate::admin::{MenuCatalog, ParentOption};
use crate::error::{Result, TaxonomyMenuError};
use crate::link::MenuParent;
use crate::sync::{LinkValues, Synchronizer};
use crate::term::TermNode;

/// Permission that shows the menu section of the term form.
pub const ADMINISTER_MENU: &str = "administer menu";

/// Permission check for the current user.
pub trait AccessCheck {
    /// Whether the current user holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;
}

impl<F> AccessCheck for F
where
    F: Fn(&str) -> bool,
{
    fn has_permission(&self, permission: &str) -> bool {
        self(permission)
    }
}

/// Menu section of the term edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMenuForm {
    /// "Provide a menu link"
    pub enabled: bool,

    /// Title template
    pub title: String,

    /// Description template
    pub description: String,

    /// Parent item; the binding's default parent when `None`
    pub menu_parent: Option<MenuParent>,

    /// Weight
    pub weight: i32,

    /// Always show children
    pub expanded: bool,
}

/// The menu section as it should be shown for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMenuFormState {
    /// Whether the current user may see the section
    pub visible: bool,

    /// Pre-filled values
    pub form: TermMenuForm,

    /// Selectable parents within the bound menu
    pub parent_options: Vec<ParentOption>,

    /// Reference of the existing link, if any
    pub link_ref: Option<MenuParent>,
}

/// Editor operations on a single term's menu link.
pub struct TermMenuEditor<'a> {
    sync: Synchronizer<'a>,
    catalog: &'a dyn MenuCatalog,
    access: &'a dyn AccessCheck,
}

impl<'a> TermMenuEditor<'a> {
    /// Create the editor service.
    pub fn new(
        sync: Synchronizer<'a>,
        catalog: &'a dyn MenuCatalog,
        access: &'a dyn AccessCheck,
    ) -> Self {
        Self {
            sync,
            catalog,
            access,
        }
    }

    /// Build the menu section for `term`.
    ///
    /// Returns `None` when the section cannot be offered: the vocabulary is
    /// not bound to a menu, or the menu has no parent positions.
    pub fn build(&self, term: &TermNode) -> Result<Option<TermMenuFormState>> {
        let Some(binding) = self.sync.bindings().binding(&term.vocabulary_id)? else {
            return Ok(None);
        };
        if binding.menu_name.is_empty() {
            return Ok(None);
        }
        let mut parent_options = self.catalog.parent_options(Some(&binding.menu_parent.menu));
        if parent_options.is_empty() {
            return Ok(None);
        }

        let (form, link_ref) = match self.sync.link_defaults(term)? {
            Some(defaults) => (
                TermMenuForm {
                    enabled: true,
                    title: defaults.title,
                    description: defaults.description,
                    menu_parent: Some(defaults.menu_parent),
                    weight: defaults.weight,
                    expanded: defaults.expanded,
                },
                Some(defaults.link_ref),
            ),
            None => (
                TermMenuForm {
                    enabled: false,
                    title: binding.link_default.title.clone(),
                    description: binding.link_default.description.clone(),
                    menu_parent: Some(binding.menu_parent.clone()),
                    weight: 0,
                    expanded: false,
                },
                None,
            ),
        };

        // Generated parents are links the catalog may not list.
        if let Some(current) = &form.menu_parent {
            if !parent_options.iter().any(|o| &o.value == current) {
                if let Some(option) = self.link_option(current)? {
                    parent_options.push(option);
                }
            }
        }

        Ok(Some(TermMenuFormState {
            visible: self.access.has_permission(ADMINISTER_MENU),
            form,
            parent_options,
            link_ref,
        }))
    }

    /// Check a submission without changing anything.
    pub fn validate(&self, term: &TermNode, form: &TermMenuForm) -> Result<()> {
        if !form.enabled {
            return Ok(());
        }
        if self.sync.renderer().render(&form.title, term)?.trim().is_empty() {
            return Err(TaxonomyMenuError::validation(
                "title",
                "Menu link title is required when the menu link is enabled.",
            ));
        }
        if let Some(parent) = &form.menu_parent {
            let own = self.sync.link_id(term)?;
            if own.is_some() && parent.parent == own {
                return Err(TaxonomyMenuError::validation(
                    "menu_parent",
                    "A menu link cannot be its own parent.",
                ));
            }
            if !self.is_available_parent(parent)? {
                return Err(TaxonomyMenuError::validation(
                    "menu_parent",
                    format!("'{}' is not an available parent item", parent),
                ));
            }
        }
        Ok(())
    }

    /// A parent is available when the catalog offers it, when it is the root
    /// of a known menu, or when it names a stored link of that menu.
    fn is_available_parent(&self, parent: &MenuParent) -> Result<bool> {
        let options = self.catalog.parent_options(Some(&parent.menu));
        if options.iter().any(|o| &o.value == parent) {
            return Ok(true);
        }
        match &parent.parent {
            None => Ok(self.catalog.menus().iter().any(|m| m.name == parent.menu)),
            Some(id) => Ok(self
                .sync
                .links()
                .load(id)?
                .is_some_and(|record| record.fields.menu == parent.menu)),
        }
    }

    fn link_option(&self, parent: &MenuParent) -> Result<Option<ParentOption>> {
        let Some(id) = &parent.parent else {
            return Ok(None);
        };
        Ok(self.sync.links().load(id)?.map(|record| ParentOption {
            value: parent.clone(),
            label: format!("-- {}", record.fields.title),
        }))
    }

    /// Apply a submission: create or replace the link when enabled, delete it
    /// otherwise.
    ///
    /// Returns the link's reference when one exists afterwards.
    pub fn submit(&self, term: &TermNode, form: &TermMenuForm) -> Result<Option<MenuParent>> {
        self.validate(term, form)?;

        if !form.enabled {
            self.sync.delete_link_for_term(term)?;
            return Ok(None);
        }

        let parent = match &form.menu_parent {
            Some(parent) => parent.clone(),
            None => self.sync.require_binding(&term.vocabulary_id)?.menu_parent,
        };
        let values = LinkValues::new(form.title.clone(), form.description.clone(), parent)
            .with_weight(form.weight)
            .with_expanded(form.expanded);
        self.sync.create_link_for_term(term, &values).map(Some)
    }
}
