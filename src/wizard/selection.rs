use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogItem};

/// Set of selected catalog item ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Start from the configured defaults, keeping only ids that are visible
    pub fn with_defaults(defaults: &[String], visible_ids: &[String]) -> Self {
        let ids = defaults
            .iter()
            .filter(|id| visible_ids.contains(id))
            .cloned()
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    pub fn toggle_item(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// All-or-nothing toggle: clears the ids if every one is selected,
    /// otherwise selects all of them.
    pub fn toggle_category(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        if self.all_selected(ids) {
            for id in ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(ids.iter().cloned());
        }
    }

    /// Select every visible item, or clear the selection when all already are
    pub fn toggle_all(&mut self, visible_ids: &[String]) {
        if self.all_selected(visible_ids) {
            self.ids.clear();
        } else {
            self.ids = visible_ids.iter().cloned().collect();
        }
    }

    /// Drop ids that are no longer visible
    pub fn prune_to_visible(&mut self, visible_ids: &[String]) {
        self.ids.retain(|id| visible_ids.contains(id));
    }

    pub fn all_selected(&self, ids: &[String]) -> bool {
        ids.iter().all(|id| self.ids.contains(id))
    }

    pub fn any_selected(&self, ids: &[String]) -> bool {
        ids.iter().any(|id| self.ids.contains(id))
    }

    /// Selected items in catalog order, which is also install order
    pub fn selected_items(&self, catalog: &Catalog) -> Vec<CatalogItem> {
        catalog
            .items()
            .filter(|item| self.ids.contains(&item.id))
            .cloned()
            .collect()
    }
}
