//! Toolbar state for the catalog listing.

use crate::api::{ProductQuery, SortKey};

/// What the operator has selected in the catalog toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    pub q: String,
    categories: Vec<String>,
    pub only_available: bool,
    pub sort: SortKey,
    show_all: bool,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            q: String::new(),
            categories: Vec::new(),
            only_available: true,
            sort: SortKey::Az,
            show_all: false,
        }
    }
}

impl CatalogFilter {
    /// Starts with `categories` preselected, as when arriving from a category tile.
    pub fn with_categories(categories: Vec<String>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Categories in effect; none while "all" is on.
    pub fn active_categories(&self) -> &[String] {
        if self.show_all {
            &[]
        } else {
            &self.categories
        }
    }

    pub fn is_selected(&self, category: &str) -> bool {
        !self.show_all && self.categories.iter().any(|c| c == category)
    }

    pub fn toggle_category(&mut self, category: &str) {
        if self.show_all {
            self.show_all = false;
            self.categories = vec![category.to_string()];
        } else if let Some(idx) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(idx);
        } else {
            self.categories.push(category.to_string());
        }
    }

    /// Turning "all" off also drops the selection it was hiding.
    pub fn toggle_show_all(&mut self) {
        if self.show_all {
            self.categories.clear();
        }
        self.show_all = !self.show_all;
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.show_all = false;
    }

    pub fn has_filters(&self) -> bool {
        !self.categories.is_empty() || self.show_all
    }

    pub fn to_query(&self) -> ProductQuery {
        ProductQuery {
            q: Some(self.q.clone()).filter(|q| !q.is_empty()),
            categories: self.active_categories().to_vec(),
            only_available: Some(self.only_available),
            sort: Some(self.sort),
            ..ProductQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_categories() {
        let mut filter = CatalogFilter::default();
        filter.toggle_category("Carnes");
        filter.toggle_category("Saladas");
        filter.toggle_category("Carnes");
        assert_eq!(filter.active_categories(), ["Saladas".to_string()]);
    }

    #[test]
    fn show_all_hides_then_clears_selection() {
        let mut filter = CatalogFilter::with_categories(vec!["Frituras".into()]);
        filter.toggle_show_all();
        assert!(filter.active_categories().is_empty());
        assert!(!filter.is_selected("Frituras"));
        assert!(filter.has_filters());

        filter.toggle_show_all();
        assert!(!filter.show_all());
        assert!(filter.active_categories().is_empty());
        assert!(!filter.has_filters());
    }

    #[test]
    fn picking_a_category_leaves_show_all() {
        let mut filter = CatalogFilter::with_categories(vec!["Frituras".into(), "Carnes".into()]);
        filter.toggle_show_all();
        filter.toggle_category("Saladas");
        assert!(!filter.show_all());
        assert_eq!(filter.active_categories(), ["Saladas".to_string()]);
    }

    #[test]
    fn builds_listing_query() {
        let mut filter = CatalogFilter::default();
        let pairs = filter.to_query().to_pairs();
        assert_eq!(pairs, vec![("sort", "az".to_string())]);

        filter.q = "frango".into();
        filter.only_available = false;
        filter.sort = SortKey::Sold;
        filter.toggle_category("Carnes");
        filter.toggle_category("Especiais");
        let pairs = filter.to_query().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("q", "frango".to_string()),
                ("cat", "Carnes,Especiais".to_string()),
                ("onlyAvailable", "false".to_string()),
                ("sort", "sold".to_string()),
            ]
        );

        filter.toggle_show_all();
        assert!(filter.to_query().categories.is_empty());
    }
}
