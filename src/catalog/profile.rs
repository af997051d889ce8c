use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Catalog, CatalogItem, Category, ProfileTag};

/// Which machine the dotfiles are being installed on.
///
/// `Personal` sees every item; `Work` hides items tagged `personal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Work,
    Personal,
}

impl Profile {
    pub fn display_name(&self) -> &'static str {
        match self {
            Profile::Work => "Work",
            Profile::Personal => "Personal",
        }
    }

    pub fn toggled(&self) -> Profile {
        match self {
            Profile::Work => Profile::Personal,
            Profile::Personal => Profile::Work,
        }
    }

    /// Whether an item is visible under this profile
    pub fn allows(&self, item: &CatalogItem) -> bool {
        match (item.profile, self) {
            (None, _) | (Some(ProfileTag::All), _) => true,
            (_, Profile::Personal) => true,
            (Some(tag), Profile::Work) => tag == ProfileTag::Work,
        }
    }
}

/// Narrow a catalog to the items visible under `profile`.
/// Categories left without items are dropped.
pub fn filter_by_profile(catalog: &Catalog, profile: Profile) -> Catalog {
    let categories = catalog
        .categories()
        .iter()
        .filter_map(|category| {
            let items: Vec<CatalogItem> = category
                .items
                .iter()
                .filter(|item| profile.allows(item))
                .cloned()
                .collect();

            if items.is_empty() {
                None
            } else {
                Some(Category {
                    name: category.name.clone(),
                    items,
                })
            }
        })
        .collect();

    Catalog::new(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample;

    #[test]
    fn test_work_hides_personal_items() {
        let work = filter_by_profile(&sample(), Profile::Work);
        assert_eq!(work.item_ids(), vec!["homebrew", "zsh", "tmux", "stow"]);
    }

    #[test]
    fn test_personal_sees_everything() {
        let catalog = sample();
        let personal = filter_by_profile(&catalog, Profile::Personal);
        assert_eq!(personal, catalog);
    }

    #[test]
    fn test_empty_categories_are_dropped() {
        let work = filter_by_profile(&sample(), Profile::Work);
        assert!(work.category("Secrets").is_none());
        assert!(work.categories().iter().all(|cat| !cat.items.is_empty()));
    }

    #[test]
    fn test_partially_filtered_category_keeps_order() {
        let work = filter_by_profile(&sample(), Profile::Work);
        let names: Vec<&str> = work.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Core", "Terminal", "Configurations"]);
        assert_eq!(work.category("Configurations").unwrap().items.len(), 1);
    }

    #[test]
    fn test_toggled_round_trips() {
        assert_eq!(Profile::Work.toggled(), Profile::Personal);
        assert_eq!(Profile::Work.toggled().toggled(), Profile::Work);
    }

    #[test]
    fn test_empty_catalog_filters_to_empty() {
        assert!(filter_by_profile(&Catalog::default(), Profile::Work).is_empty());
    }
}
