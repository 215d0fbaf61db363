use serde::{Deserialize, Serialize};

use crate::domain::types::ProductId;
use crate::domain::{Entity, money, optional};
use crate::filter::{CategoryOption, Filterable};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub description: String,
    #[serde(default)]
    pub detail: Option<String>,
    pub price: f64,
    pub stock: i32,
    #[serde(default)]
    pub is_illegal: bool,
}

/// Payload for `POST /products`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub description: String,
    pub detail: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub is_illegal: bool,
}

/// Payload for `PUT /products/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub description: String,
    pub detail: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub is_illegal: bool,
}

/// Payload for `PATCH /products/{id}`; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockFilter {
    WithStock,
    WithoutStock,
}

impl CategoryOption for StockFilter {
    fn all() -> &'static [Self] {
        &[StockFilter::WithStock, StockFilter::WithoutStock]
    }

    fn key(&self) -> &'static str {
        match self {
            StockFilter::WithStock => "with",
            StockFilter::WithoutStock => "without",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StockFilter::WithStock => "Has stock",
            StockFilter::WithoutStock => "No stock",
        }
    }
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for Product {
    type Id = ProductId;

    const COLUMNS: &'static [&'static str] = &["Id", "Description", "Detail", "Price", "Stock", "Illegal"];

    fn id(&self) -> ProductId {
        self.id
    }

    fn display_name(&self) -> String {
        self.description.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description.clone(),
            optional(&self.detail),
            money(self.price),
            self.stock.to_string(),
            if self.is_illegal { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Filterable for Product {
    type Category = StockFilter;

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description.clone(),
            optional(&self.detail),
        ]
    }

    fn matches_category(&self, category: StockFilter) -> bool {
        match category {
            StockFilter::WithStock => self.in_stock(),
            StockFilter::WithoutStock => !self.in_stock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterState, filtered_view};
    use serde_json::json;

    fn product(id: i32, description: &str, stock: i32) -> Product {
        Product {
            id: ProductId::new(id).expect("valid id"),
            description: description.to_string(),
            detail: None,
            price: 10.0,
            stock,
            is_illegal: false,
        }
    }

    #[test]
    fn whisky_with_stock_matches_only_the_first_product() {
        let products = vec![product(1, "Whisky", 10), product(2, "Gorro", 0)];
        let filter = FilterState::from_query(Some("whisky"), Some("with"));

        let view = filtered_view(&products, &filter);

        assert_eq!(view, vec![&products[0]]);
    }

    #[test]
    fn without_stock_selects_empty_shelves() {
        let products = vec![product(1, "Whisky", 10), product(2, "Gorro", 0)];
        let filter = FilterState::new("", Some(StockFilter::WithoutStock));

        let view = filtered_view(&products, &filter);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].description, "Gorro");
    }

    #[test]
    fn decodes_camel_case_wire_format() {
        let product: Product = serde_json::from_value(json!({
            "id": 4,
            "description": "Habano",
            "price": 12.5,
            "stock": 3,
            "isIllegal": true
        }))
        .expect("valid product json");

        assert!(product.is_illegal);
        assert_eq!(product.detail, None);
        assert_eq!(product.cells()[3], "12.50");
    }

    #[test]
    fn patch_omits_untouched_fields() {
        let patch = ProductPatch {
            stock: Some(0),
            price: None,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"stock": 0}));
    }
}
