//! # Taxonomy Menu
//!
//! Binds a taxonomy vocabulary to a navigation menu and keeps one menu link
//! per term in sync with the term tree.
//!
//! ## Architecture
//!
//! - **Binding**: per-vocabulary settings (target menu, default parent,
//!   title/description templates) plus the `term -> link` index
//! - **Synchronizer**: creates, replaces and deletes the link of a single
//!   term, and walks a whole term tree to generate a mirrored menu
//! - **Admin / Form**: the administrator settings path and the per-term
//!   editor path built on top of the synchronizer
//!
//! The host's storage, token engine and permission system are collaborators
//! expressed as traits ([`BindingStore`], [`LinkStore`], [`TermTree`],
//! [`TemplateRenderer`], [`AccessCheck`]) and passed in explicitly.
//!
//! ## Example
//!
//! ```
//! use taxonomy_menu::*;
//!
//! let mut terms = MemoryTermTree::new();
//! let red = terms.insert("colors", 1, TermId::ROOT, "red").unwrap();
//! terms.insert("colors", 2, red.id, "crimson").unwrap();
//!
//! let bindings = MemoryBindingStore::new();
//! let root: MenuParent = "main:".parse().unwrap();
//! bindings
//!     .put_binding(VocabularyBinding::new("colors", "main", root.clone()))
//!     .unwrap();
//!
//! let links = MemoryLinkStore::new();
//! let renderer = TokenRenderer::new();
//! let sync = Synchronizer::new(&bindings, &links, &terms, &renderer);
//!
//! let templates = LinkTemplates::new("[term:name]", "");
//! let report = sync
//!     .bulk_generate(&"colors".into(), &templates, &root, TermId::ROOT)
//!     .unwrap();
//! assert_eq!(report.created, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod admin;
pub mod binding;
pub mod config;
pub mod error;
pub mod form;
pub mod link;
pub mod lock;
pub mod sync;
pub mod template;
pub mod term;

// Re-export main types
pub use admin::{
    MenuCatalog, MenuInfo, ParentOption, SettingsOutcome, StaticMenuCatalog,
    VocabularyMenuAdmin, VocabularySettingsForm, VocabularySettingsInput,
};
pub use binding::{LinkIndex, LinkTemplates, Settings, VocabularyBinding};
pub use config::{BindingStore, JsonSettingsStore, MemoryBindingStore};
pub use error::{Result, TaxonomyMenuError};
pub use form::{AccessCheck, TermMenuEditor, TermMenuForm, TermMenuFormState, ADMINISTER_MENU};
pub use link::{LinkId, LinkStore, MemoryLinkStore, MenuLinkRecord, MenuParent, NewMenuLink};
pub use lock::VocabularyLocks;
pub use sync::{GenerateReport, LinkDefaults, LinkValues, Synchronizer};
pub use template::{TemplateRenderer, TokenContext, TokenRenderer};
pub use term::{MemoryTermTree, TermId, TermNode, TermTree, VocabularyId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
