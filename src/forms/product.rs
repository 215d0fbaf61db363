use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::product::{NewProduct, Product, ProductPatch, UpdateProduct};
use crate::domain::types::non_blank;
use crate::forms::{
    EntityForm, FieldErrors, FieldKind, FieldSpec, FormError, FormMode, check_amount,
    check_count, invalid, parse_amount, parse_count,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Create/edit panel of the product screen.
pub struct ProductForm {
    #[validate(length(min = 2, max = 120, message = "Description must be 2 to 120 characters long"))]
    pub description: String,
    #[validate(length(max = 500, message = "Detail must be at most 500 characters long"))]
    pub detail: String,
    pub price: String,
    pub stock: String,
    pub is_illegal: bool,
}

impl ProductForm {
    fn parsed_numbers(&self) -> Result<(f64, i32), FormError> {
        let price = parse_amount(&self.price)
            .ok_or_else(|| invalid("price", "Must be a number greater than or equal to 0"))?;
        let stock = parse_count(&self.stock).ok_or_else(|| {
            invalid("stock", "Must be a whole number greater than or equal to 0")
        })?;
        Ok((price, stock))
    }
}

/// Inline stock adjustment on the product list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StockForm {
    pub stock: String,
}

impl StockForm {
    /// Partial update touching only the stock count.
    pub fn to_patch(&self) -> Result<ProductPatch, FormError> {
        let stock = parse_count(&self.stock).ok_or_else(|| {
            invalid("stock", "Must be a whole number greater than or equal to 0")
        })?;
        Ok(ProductPatch {
            stock: Some(stock),
            price: None,
        })
    }
}

impl EntityForm for ProductForm {
    type Item = Product;
    type Create = NewProduct;
    type Update = UpdateProduct;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("description", "Description", FieldKind::Text).required(),
        FieldSpec::new("detail", "Detail", FieldKind::TextArea),
        FieldSpec::new("price", "Price", FieldKind::Number).required(),
        FieldSpec::new("stock", "Stock", FieldKind::Number).required(),
        FieldSpec::new("is_illegal", "Illegal", FieldKind::Checkbox),
    ];

    fn from_item(item: &Product) -> Self {
        Self {
            description: item.description.clone(),
            detail: item.detail.clone().unwrap_or_default(),
            price: item.price.to_string(),
            stock: item.stock.to_string(),
            is_illegal: item.is_illegal,
        }
    }

    fn check_extra(&self, _mode: FormMode, errors: &mut FieldErrors) {
        check_amount(errors, "price", &self.price);
        check_count(errors, "stock", &self.stock);
    }

    fn to_create(&self) -> Result<NewProduct, FormError> {
        self.ensure_valid(FormMode::Create)?;
        let (price, stock) = self.parsed_numbers()?;
        Ok(NewProduct {
            description: self.description.trim().to_string(),
            detail: non_blank(&self.detail),
            price,
            stock,
            is_illegal: self.is_illegal,
        })
    }

    fn to_update(&self) -> Result<UpdateProduct, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        let (price, stock) = self.parsed_numbers()?;
        Ok(UpdateProduct {
            description: self.description.trim().to_string(),
            detail: non_blank(&self.detail),
            price,
            stock,
            is_illegal: self.is_illegal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED_MESSAGE;

    fn filled() -> ProductForm {
        ProductForm {
            description: "Whisky".into(),
            detail: "  ".into(),
            price: "10.5".into(),
            stock: "4".into(),
            is_illegal: false,
        }
    }

    #[test]
    fn stock_form_patches_only_the_stock() {
        let patch = StockForm { stock: " 12 ".into() }.to_patch().expect("valid stock");
        assert_eq!(patch.stock, Some(12));
        assert_eq!(patch.price, None);

        assert!(StockForm { stock: "-3".into() }.to_patch().is_err());
        assert!(StockForm::default().to_patch().is_err());
    }

    #[test]
    fn valid_form_builds_trimmed_payload() {
        let payload = filled().to_create().expect("valid form");
        assert_eq!(payload.price, 10.5);
        assert_eq!(payload.stock, 4);
        assert_eq!(payload.detail, None);
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let form = ProductForm::default();
        let errors = form.field_errors(FormMode::Create);
        assert_eq!(errors.get("description").map(String::as_str), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("price").map(String::as_str), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("stock").map(String::as_str), Some(REQUIRED_MESSAGE));
        assert!(!errors.contains_key("detail"));
    }

    #[test]
    fn negative_stock_is_rejected() {
        let form = ProductForm {
            stock: "-1".into(),
            ..filled()
        };
        let errors = form.field_errors(FormMode::Edit);
        assert!(errors.contains_key("stock"));
        assert!(matches!(form.to_update(), Err(FormError::Invalid(_))));
    }

    #[test]
    fn short_description_uses_length_message() {
        let form = ProductForm {
            description: "W".into(),
            ..filled()
        };
        let errors = form.field_errors(FormMode::Create);
        assert_eq!(
            errors["description"],
            "Description must be 2 to 120 characters long"
        );
    }
}
