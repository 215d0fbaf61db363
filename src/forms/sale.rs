use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::sale::{NewSale, NewSaleDetail, Sale, UpdateSale};
use crate::domain::types::{Dni, ProductId};
use crate::forms::{
    EntityForm, FieldErrors, FieldKind, FieldSpec, FormError, FormMode, check_dni, invalid,
    optional_dni,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Create/edit panel of the sale screen.
pub struct SaleForm {
    pub client_dni: String,
    pub authority_dni: String,
    /// One `<product id>:<quantity>` pair per line.
    pub details: String,
}

/// Parses the details textarea, reporting the first malformed line.
fn parse_details(text: &str) -> Result<Vec<NewSaleDetail>, String> {
    let mut details = Vec::new();
    for (index, line) in text
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
    {
        let line_no = index + 1;
        let (product, quantity) = line
            .split_once(':')
            .ok_or_else(|| format!("Line {line_no}: expected <product id>:<quantity>"))?;
        let product_id = product
            .parse::<ProductId>()
            .map_err(|_| format!("Line {line_no}: invalid product id"))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| format!("Line {line_no}: quantity must be at least 1"))?;
        details.push(NewSaleDetail {
            product_id,
            quantity,
        });
    }
    if details.is_empty() {
        return Err("Add at least one product line".to_string());
    }
    Ok(details)
}

impl SaleForm {
    fn parsed(&self) -> Result<(Dni, Option<Dni>, Vec<NewSaleDetail>), FormError> {
        let client_dni = Dni::new(self.client_dni.as_str())?;
        let authority_dni = optional_dni(&self.authority_dni)?;
        let details = parse_details(&self.details).map_err(|msg| invalid("details", &msg))?;
        Ok((client_dni, authority_dni, details))
    }
}

impl EntityForm for SaleForm {
    type Item = Sale;
    type Create = NewSale;
    type Update = UpdateSale;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("client_dni", "Client DNI", FieldKind::Text).required(),
        FieldSpec::new("authority_dni", "Authority DNI", FieldKind::Text),
        FieldSpec::new("details", "Products (id:quantity per line)", FieldKind::TextArea)
            .required(),
    ];

    fn from_item(item: &Sale) -> Self {
        Self {
            client_dni: item
                .client
                .as_ref()
                .map(|c| c.dni.to_string())
                .unwrap_or_default(),
            authority_dni: item
                .authority
                .as_ref()
                .map(|a| a.dni.to_string())
                .unwrap_or_default(),
            details: item
                .details
                .iter()
                .map(|d| format!("{}:{}", d.product.id, d.quantity))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn check_extra(&self, _mode: FormMode, errors: &mut FieldErrors) {
        check_dni(errors, "client_dni", &self.client_dni);
        check_dni(errors, "authority_dni", &self.authority_dni);
        if self.details.trim().is_empty() {
            return;
        }
        if let Err(message) = parse_details(&self.details) {
            errors.insert("details".to_string(), message);
        }
    }

    fn to_create(&self) -> Result<NewSale, FormError> {
        self.ensure_valid(FormMode::Create)?;
        let (client_dni, authority_dni, details) = self.parsed()?;
        Ok(NewSale {
            client_dni,
            authority_dni,
            details,
        })
    }

    fn to_update(&self) -> Result<UpdateSale, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        let (client_dni, authority_dni, details) = self.parsed()?;
        Ok(UpdateSale {
            client_dni,
            authority_dni,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_line_per_product() {
        let details = parse_details("1:2\n\n 7 : 1 ").expect("valid lines");
        assert_eq!(details.len(), 2);
        assert_eq!(details[1].product_id.get(), 7);
        assert_eq!(details[1].quantity, 1);
    }

    #[test]
    fn reports_the_offending_line() {
        assert_eq!(
            parse_details("1:2\n3:0"),
            Err("Line 2: quantity must be at least 1".to_string())
        );
        assert_eq!(
            parse_details("abc"),
            Err("Line 1: expected <product id>:<quantity>".to_string())
        );
    }

    #[test]
    fn blank_authority_is_allowed() {
        let form = SaleForm {
            client_dni: "30123456".into(),
            authority_dni: "  ".into(),
            details: "1:1".into(),
        };
        let payload = form.to_create().expect("valid form");
        assert_eq!(payload.authority_dni, None);
    }
}
