//! Listing request object for `GET /api/products`.

use crate::model::DishType;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical.
    #[default]
    Az,
    /// Most sold first.
    Sold,
    /// Shortest preparation first.
    Fast,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Az => "az",
            SortKey::Sold => "sold",
            SortKey::Fast => "fast",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "az" => Some(SortKey::Az),
            "sold" => Some(SortKey::Sold),
            "fast" => Some(SortKey::Fast),
            _ => None,
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters understood by the listing endpoint. Every field is optional; an
/// all-default query produces the bare listing path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub categories: Vec<String>,
    /// The API defaults to available-only, so only `Some(false)` is sent.
    pub only_available: Option<bool>,
    pub recurring: Option<bool>,
    pub portion: Option<bool>,
    pub dish_type: Option<DishType>,
    pub sort: Option<SortKey>,
    pub take: Option<u32>,
}

impl ProductQuery {
    pub fn search(q: impl Into<String>, take: u32) -> Self {
        Self {
            q: Some(q.into()),
            take: Some(take),
            ..Self::default()
        }
    }

    /// Query-string pairs in wire order, with omitted parameters left out.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if !self.categories.is_empty() {
            pairs.push(("cat", self.categories.join(",")));
        }
        if self.only_available == Some(false) {
            pairs.push(("onlyAvailable", "false".to_string()));
        }
        if let Some(recurring) = self.recurring {
            pairs.push(("recurring", recurring.to_string()));
        }
        if let Some(portion) = self.portion {
            pairs.push(("portion", portion.to_string()));
        }
        if let Some(dish_type) = self.dish_type {
            pairs.push(("type", dish_type.as_str().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(take) = self.take.filter(|t| *t > 0) {
            pairs.push(("take", take.to_string()));
        }
        pairs
    }
}
