//! Catalog products, the editable product form and category summaries.
//!
//! Products are owned by the API. The salon screen wraps each one in a
//! [`ProductCard`](crate::card_actor::ProductCard) replica entry; the products
//! surface edits them through a [`ProductForm`].

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Preparation time given to a new product unless the operator changes it.
pub const DEFAULT_PREP_SECONDS: u32 = 300;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Dish-type variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DishType {
    #[default]
    #[serde(rename = "Prato")]
    Dish,
    #[serde(rename = "Porcao")]
    Portion,
}

impl DishType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DishType::Dish => "Prato",
            DishType::Portion => "Porcao",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Prato" | "prato" | "dish" => Some(DishType::Dish),
            "Porcao" | "porcao" | "portion" => Some(DishType::Portion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub prep_seconds: u32,
    pub available: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(rename = "type", default)]
    pub dish_type: DishType,
}

impl Product {
    /// Preparation time rounded up to whole minutes.
    pub fn prep_minutes(&self) -> u32 {
        self.prep_seconds.div_ceil(60)
    }

    /// The full-replacement payload with availability flipped.
    pub fn toggled_availability(&self) -> ProductForm {
        ProductForm {
            available: !self.available,
            ..ProductForm::from(self)
        }
    }
}

/// A product without identity; the body of create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub prep_seconds: u32,
    pub available: bool,
    pub tags: Vec<String>,
    pub is_recurring: bool,
    #[serde(rename = "type")]
    pub dish_type: DishType,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            prep_seconds: DEFAULT_PREP_SECONDS,
            available: true,
            tags: Vec::new(),
            is_recurring: false,
            dish_type: DishType::Dish,
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category.clone(),
            prep_seconds: p.prep_seconds,
            available: p.available,
            tags: p.tags.clone(),
            is_recurring: p.is_recurring,
            dish_type: p.dish_type,
        }
    }
}

impl ProductForm {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            prep_seconds: self.prep_seconds,
            available: self.available,
            tags: self.tags,
            is_recurring: self.is_recurring,
            dish_type: self.dish_type,
        }
    }
}

/// Splits a comma-separated tag field, trimming and dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// One entry of `GET /api/products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wire_product() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Batata frita",
            "category": "Frituras",
            "prepSeconds": 420,
            "available": true,
            "tags": ["vegano"],
            "isRecurring": true,
            "type": "Porcao"
        }))
        .unwrap();
        assert_eq!(product.dish_type, DishType::Portion);
        assert_eq!(product.prep_minutes(), 7);
        assert!(product.is_recurring);
    }

    #[test]
    fn form_defaults() {
        let form = ProductForm::default();
        assert_eq!(form.prep_seconds, 300);
        assert!(form.available);
        assert_eq!(form.dish_type, DishType::Dish);
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["type"], "Prato");
        assert_eq!(body["prepSeconds"], 300);
    }

    #[test]
    fn toggle_keeps_other_fields() {
        let product = ProductForm {
            name: "Salada".into(),
            tags: vec!["leve".into()],
            ..ProductForm::default()
        }
        .into_product(ProductId::from("p2"));
        let toggled = product.toggled_availability();
        assert!(!toggled.available);
        assert_eq!(toggled.name, "Salada");
        assert_eq!(toggled.tags, vec!["leve".to_string()]);
    }

    #[test]
    fn tags_split_trim_and_drop_empties() {
        assert_eq!(
            parse_tags(" picante, ,sem gluten ,,"),
            vec!["picante".to_string(), "sem gluten".to_string()]
        );
        assert!(parse_tags("   ").is_empty());
    }
}
