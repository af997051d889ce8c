//! Static catalog of installable items, grouped into ordered categories.

mod profile;

pub use profile::{filter_by_profile, Profile};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{InstallerError, Result};

/// Profile restriction carried by a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTag {
    Work,
    Personal,
    All,
}

/// A single installable component backed by an install script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable identifier, unique across the whole catalog
    pub id: String,
    /// Display name (e.g., "Zsh with Oh My Zsh")
    pub name: String,
    /// One-line description shown next to the name
    #[serde(default)]
    pub description: String,
    /// Script to execute, relative to the repository root unless absolute
    pub script: String,
    /// Profile restriction; absent means visible everywhere
    #[serde(default)]
    pub profile: Option<ProfileTag>,
    /// What the script will do, shown when the item is focused
    #[serde(default)]
    pub details: Vec<String>,
}

/// A named group of catalog items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Ordered list of categories. Iteration order is configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.name == name)
    }

    /// All items in catalog iteration order
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.categories.iter().flat_map(|cat| cat.items.iter())
    }

    /// All item ids in catalog iteration order
    pub fn item_ids(&self) -> Vec<String> {
        self.items().map(|item| item.id.clone()).collect()
    }

    /// Reject catalogs the wizard cannot address unambiguously
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();

        for category in &self.categories {
            if !names.insert(category.name.as_str()) {
                return Err(InstallerError::Catalog(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }

            for item in &category.items {
                if item.id.trim().is_empty() {
                    return Err(InstallerError::Catalog(format!(
                        "item '{}' in category '{}' has an empty id",
                        item.name, category.name
                    )));
                }
                if item.script.trim().is_empty() {
                    return Err(InstallerError::Catalog(format!(
                        "item '{}' has no script",
                        item.id
                    )));
                }
                if !ids.insert(item.id.as_str()) {
                    return Err(InstallerError::Catalog(format!(
                        "duplicate item id '{}'",
                        item.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(id: &str, profile: Option<ProfileTag>) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("{id} name"),
            description: format!("{id} description"),
            script: format!("./{id}/install.sh"),
            profile,
            details: Vec::new(),
        }
    }

    pub fn category(name: &str, items: Vec<CatalogItem>) -> Category {
        Category {
            name: name.to_string(),
            items,
        }
    }

    /// Small catalog mixing every kind of profile tag
    pub fn sample() -> Catalog {
        Catalog::new(vec![
            category("Core", vec![item("homebrew", None)]),
            category(
                "Terminal",
                vec![item("zsh", None), item("tmux", Some(ProfileTag::Work))],
            ),
            category(
                "Configurations",
                vec![
                    item("stow", Some(ProfileTag::All)),
                    item("git", Some(ProfileTag::Personal)),
                    item("claude", Some(ProfileTag::Personal)),
                ],
            ),
            category("Secrets", vec![item("pass", Some(ProfileTag::Personal))]),
        ])
    }
}
