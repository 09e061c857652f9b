//! Menu link entities, stable references and the link store

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxonomyMenuError};

/// Identifier of a stored menu link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    /// Create a link id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LinkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stable reference to a position in a menu.
///
/// The text form is `"<menu>:<link id>"`, or `"<menu>:"` for the top level
/// of the menu. A link's own reference is what its children use as parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuParent {
    /// Menu machine name
    pub menu: String,

    /// Parent link within the menu, `None` for the menu root
    pub parent: Option<LinkId>,
}

impl MenuParent {
    /// Reference to the top level of `menu`.
    pub fn root(menu: impl Into<String>) -> Self {
        Self {
            menu: menu.into(),
            parent: None,
        }
    }

    /// Reference to the link `parent` inside `menu`.
    pub fn link(menu: impl Into<String>, parent: LinkId) -> Self {
        Self {
            menu: menu.into(),
            parent: Some(parent),
        }
    }

    /// Whether this points at the menu root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for MenuParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}:{}", self.menu, parent),
            None => write!(f, "{}:", self.menu),
        }
    }
}

impl FromStr for MenuParent {
    type Err = TaxonomyMenuError;

    fn from_str(s: &str) -> Result<Self> {
        let (menu, parent) = s
            .split_once(':')
            .ok_or_else(|| TaxonomyMenuError::InvalidParent(s.to_string()))?;
        if menu.is_empty() {
            return Err(TaxonomyMenuError::InvalidParent(s.to_string()));
        }
        Ok(Self {
            menu: menu.to_string(),
            parent: (!parent.is_empty()).then(|| LinkId::new(parent)),
        })
    }
}

impl Serialize for MenuParent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MenuParent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fields of a menu link about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuLink {
    /// Menu the link lives in
    pub menu: String,

    /// Parent link, `None` for a top-level link
    pub parent: Option<LinkId>,

    /// Link text
    pub title: String,

    /// Hover text
    pub description: String,

    /// Ordering among siblings, lower first
    pub weight: i32,

    /// Target URI
    pub link_uri: String,

    /// Whether the link is shown
    pub enabled: bool,

    /// Whether children are always shown
    pub expanded: bool,
}

impl NewMenuLink {
    /// Create an enabled link with zero weight placed under `parent`.
    pub fn new(parent: &MenuParent, title: impl Into<String>, link_uri: impl Into<String>) -> Self {
        Self {
            menu: parent.menu.clone(),
            parent: parent.parent.clone(),
            title: title.into(),
            description: String::new(),
            weight: 0,
            link_uri: link_uri.into(),
            enabled: true,
            expanded: false,
        }
    }
}

/// A stored menu link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLinkRecord {
    /// Store-assigned id
    pub id: LinkId,

    /// Link fields
    #[serde(flatten)]
    pub fields: NewMenuLink,
}

impl MenuLinkRecord {
    /// Where this link sits: its menu plus parent link.
    pub fn parent_reference(&self) -> MenuParent {
        MenuParent {
            menu: self.fields.menu.clone(),
            parent: self.fields.parent.clone(),
        }
    }

    /// Reference children of this link use as their parent.
    pub fn self_reference(&self) -> MenuParent {
        MenuParent::link(self.fields.menu.clone(), self.id.clone())
    }
}

/// Persistence for menu link entities.
pub trait LinkStore {
    /// Persist a new link and return it with its assigned id.
    fn create(&self, link: NewMenuLink) -> Result<MenuLinkRecord>;

    /// Load a link, `None` if the id does not resolve.
    fn load(&self, id: &LinkId) -> Result<Option<MenuLinkRecord>>;

    /// Delete a link. Returns `false` if it did not exist.
    ///
    /// Links below the deleted one move up to its parent.
    fn delete(&self, id: &LinkId) -> Result<bool>;
}

/// In-memory link store with sequential ids.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    links: DashMap<LinkId, MenuLinkRecord>,
    next_id: AtomicU64,
}

impl MemoryLinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// All links in `menu`, ordered by id.
    pub fn links_in(&self, menu: &str) -> Vec<MenuLinkRecord> {
        let mut records: Vec<MenuLinkRecord> = self
            .links
            .iter()
            .filter(|entry| entry.value().fields.menu == menu)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.id.as_str().parse::<u64>().unwrap_or(u64::MAX));
        records
    }
}

impl LinkStore for MemoryLinkStore {
    fn create(&self, link: NewMenuLink) -> Result<MenuLinkRecord> {
        let id = LinkId::new((self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_string());
        let record = MenuLinkRecord {
            id: id.clone(),
            fields: link,
        };
        self.links.insert(id, record.clone());
        Ok(record)
    }

    fn load(&self, id: &LinkId) -> Result<Option<MenuLinkRecord>> {
        Ok(self.links.get(id).map(|entry| entry.value().clone()))
    }

    fn delete(&self, id: &LinkId) -> Result<bool> {
        let Some((_, removed)) = self.links.remove(id) else {
            return Ok(false);
        };
        for mut entry in self.links.iter_mut() {
            if entry.fields.parent.as_ref() == Some(id) {
                entry.fields.parent = removed.fields.parent.clone();
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_reference() {
        let parent: MenuParent = "main:".parse().unwrap();
        assert_eq!(parent, MenuParent::root("main"));
        assert!(parent.is_root());
        assert_eq!(parent.to_string(), "main:");
    }

    #[test]
    fn test_parse_link_reference_splits_at_first_colon() {
        let parent: MenuParent = "footer:menu_link_content:abc".parse().unwrap();
        assert_eq!(parent.menu, "footer");
        assert_eq!(parent.parent, Some(LinkId::new("menu_link_content:abc")));
        assert_eq!(parent.to_string(), "footer:menu_link_content:abc");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("main".parse::<MenuParent>().is_err());
        assert!(":7".parse::<MenuParent>().is_err());
    }

    #[test]
    fn test_menu_parent_serializes_as_string() {
        let parent = MenuParent::link("main", LinkId::new("3"));
        let json = serde_json::to_string(&parent).unwrap();
        assert_eq!(json, "\"main:3\"");
        let back: MenuParent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parent);
    }

    #[test]
    fn test_memory_store_create_load_delete() {
        let store = MemoryLinkStore::new();
        let link = NewMenuLink::new(&MenuParent::root("main"), "Home", "internal:/");
        let record = store.create(link).unwrap();

        assert_eq!(store.load(&record.id).unwrap(), Some(record.clone()));
        assert!(store.delete(&record.id).unwrap());
        assert!(!store.delete(&record.id).unwrap());
        assert_eq!(store.load(&record.id).unwrap(), None);
    }

    #[test]
    fn test_delete_moves_children_up() {
        let store = MemoryLinkStore::new();
        let top = MenuParent::link("main", LinkId::new("about"));
        let parent = store.create(NewMenuLink::new(&top, "parent", "a")).unwrap();
        let child = store
            .create(NewMenuLink::new(&parent.self_reference(), "child", "b"))
            .unwrap();
        let sibling = store.create(NewMenuLink::new(&top, "sibling", "c")).unwrap();

        assert!(store.delete(&parent.id).unwrap());
        let child = store.load(&child.id).unwrap().unwrap();
        assert_eq!(child.parent_reference(), top);
        assert_eq!(store.load(&sibling.id).unwrap().unwrap().parent_reference(), top);
    }

    #[test]
    fn test_record_references() {
        let store = MemoryLinkStore::new();
        let parent = MenuParent::link("main", LinkId::new("9"));
        let record = store.create(NewMenuLink::new(&parent, "x", "y")).unwrap();

        assert_eq!(record.parent_reference(), parent);
        assert_eq!(record.self_reference(), MenuParent::link("main", record.id.clone()));
    }
}
