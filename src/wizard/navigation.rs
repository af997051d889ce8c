use crate::catalog::{Catalog, CatalogItem};

/// One addressable row in the selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatEntry {
    /// Category header; toggling it toggles the whole category
    Header { category: String },
    /// A selectable catalog item
    Item { category: String, item: CatalogItem },
}

impl FlatEntry {
    /// Stable row id: `category-<name>` for headers, the item id for leaves
    pub fn id(&self) -> String {
        match self {
            FlatEntry::Header { category } => format!("category-{category}"),
            FlatEntry::Item { item, .. } => item.id.clone(),
        }
    }

    pub fn category(&self) -> &str {
        match self {
            FlatEntry::Header { category } | FlatEntry::Item { category, .. } => category,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, FlatEntry::Header { .. })
    }
}

/// Flattened, cursor-addressable view of a filtered catalog
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    entries: Vec<FlatEntry>,
    cursor: usize,
}

impl Navigation {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            entries: flatten(catalog),
            cursor: 0,
        }
    }

    /// Rebuild from a new catalog view.
    ///
    /// The cursor follows the row it was on if that row still exists,
    /// otherwise it is clamped to the last row.
    pub fn rebuild(&mut self, catalog: &Catalog) {
        let focused = self.current().map(FlatEntry::id);
        self.entries = flatten(catalog);

        let relocated = focused.and_then(|id| self.entries.iter().position(|e| e.id() == id));
        self.cursor = match relocated {
            Some(idx) => idx,
            None => self.cursor.min(self.entries.len().saturating_sub(1)),
        };
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&FlatEntry> {
        self.entries.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + len - 1) % len;
    }

    pub fn move_down(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Ids of every item listed under a category header
    pub fn category_item_ids(&self, category: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                FlatEntry::Item { category: c, item } if c == category => Some(item.id.clone()),
                _ => None,
            })
            .collect()
    }
}

fn flatten(catalog: &Catalog) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for category in catalog.categories() {
        entries.push(FlatEntry::Header {
            category: category.name.clone(),
        });
        for item in &category.items {
            entries.push(FlatEntry::Item {
                category: category.name.clone(),
                item: item.clone(),
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample;
    use crate::catalog::{filter_by_profile, Profile};

    fn ids(nav: &Navigation) -> Vec<String> {
        nav.entries().iter().map(FlatEntry::id).collect()
    }

    #[test]
    fn test_flatten_interleaves_headers_and_items() {
        let nav = Navigation::new(&filter_by_profile(&sample(), Profile::Work));
        assert_eq!(
            ids(&nav),
            vec![
                "category-Core",
                "homebrew",
                "category-Terminal",
                "zsh",
                "tmux",
                "category-Configurations",
                "stow",
            ]
        );
    }

    #[test]
    fn test_items_belong_to_preceding_header() {
        let nav = Navigation::new(&sample());
        let mut header = None;
        for entry in nav.entries() {
            match entry {
                FlatEntry::Header { category } => header = Some(category.clone()),
                FlatEntry::Item { category, .. } => {
                    assert_eq!(Some(category.clone()), header)
                }
            }
        }
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut nav = Navigation::new(&sample());
        nav.move_up();
        assert_eq!(nav.cursor(), nav.len() - 1);
        nav.move_down();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_empty_navigation_does_not_move() {
        let mut nav = Navigation::new(&Catalog::default());
        nav.move_up();
        nav.move_down();
        assert_eq!(nav.cursor(), 0);
        assert!(nav.current().is_none());
    }

    #[test]
    fn test_category_item_ids() {
        let nav = Navigation::new(&sample());
        assert_eq!(nav.category_item_ids("Terminal"), vec!["zsh", "tmux"]);
        assert!(nav.category_item_ids("Missing").is_empty());
    }

    #[test]
    fn test_rebuild_keeps_cursor_on_same_row() {
        let catalog = sample();
        let mut nav = Navigation::new(&filter_by_profile(&catalog, Profile::Work));
        // Move onto "stow"
        while nav.current().map(FlatEntry::id).as_deref() != Some("stow") {
            nav.move_down();
        }

        nav.rebuild(&filter_by_profile(&catalog, Profile::Personal));
        assert_eq!(nav.current().map(FlatEntry::id).as_deref(), Some("stow"));
    }

    #[test]
    fn test_rebuild_clamps_when_row_disappears() {
        let catalog = sample();
        let mut nav = Navigation::new(&catalog);
        nav.move_up(); // last row: "pass", personal-only

        nav.rebuild(&filter_by_profile(&catalog, Profile::Work));
        assert_eq!(nav.cursor(), nav.len() - 1);
        assert_eq!(nav.current().map(FlatEntry::id).as_deref(), Some("stow"));
    }

    #[test]
    fn test_rebuild_to_empty_resets_cursor() {
        let mut nav = Navigation::new(&sample());
        nav.move_down();
        nav.rebuild(&Catalog::default());
        assert_eq!(nav.cursor(), 0);
        assert!(nav.is_empty());
    }
}
