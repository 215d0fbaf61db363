use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Dni, ProductId, SaleId};
use crate::domain::{Entity, money};
use crate::filter::{CategoryOption, Filterable};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub client: Option<PersonRef>,
    #[serde(default)]
    pub authority: Option<PersonRef>,
    #[serde(default)]
    pub details: Vec<SaleDetail>,
    pub total: f64,
}

/// Nested reference to a DNI-keyed person (client or authority).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub dni: Dni,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub product: ProductRef,
    pub quantity: u32,
    /// Computed by the backend.
    pub subtotal: f64,
}

/// One requested line of a sale; subtotals are computed server side.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleDetail {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Payload for `POST /sales`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub client_dni: Dni,
    pub authority_dni: Option<Dni>,
    pub details: Vec<NewSaleDetail>,
}

/// Payload for `PUT /sales/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSale {
    pub client_dni: Dni,
    pub authority_dni: Option<Dni>,
    pub details: Vec<NewSaleDetail>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorityFilter {
    WithAuthority,
    WithoutAuthority,
}

impl CategoryOption for AuthorityFilter {
    fn all() -> &'static [Self] {
        &[AuthorityFilter::WithAuthority, AuthorityFilter::WithoutAuthority]
    }

    fn key(&self) -> &'static str {
        match self {
            AuthorityFilter::WithAuthority => "with",
            AuthorityFilter::WithoutAuthority => "without",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AuthorityFilter::WithAuthority => "With authority",
            AuthorityFilter::WithoutAuthority => "Without authority",
        }
    }
}

impl Entity for Sale {
    type Id = SaleId;

    const COLUMNS: &'static [&'static str] = &["Id", "Date", "Client", "Authority", "Items", "Total"];

    fn id(&self) -> SaleId {
        self.id
    }

    fn display_name(&self) -> String {
        format!("sale #{}", self.id)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M").to_string(),
            self.client
                .as_ref()
                .map(|c| format!("{} ({})", c.name, c.dni))
                .unwrap_or_default(),
            self.authority
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            self.details
                .iter()
                .map(|d| format!("{} x{}", d.product.description, d.quantity))
                .collect::<Vec<_>>()
                .join(", "),
            money(self.total),
        ]
    }
}

impl Filterable for Sale {
    type Category = AuthorityFilter;

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.id.to_string()];
        if let Some(client) = &self.client {
            fields.push(client.dni.to_string());
            fields.push(client.name.clone());
        }
        if let Some(authority) = &self.authority {
            fields.push(authority.name.clone());
        }
        fields.extend(self.details.iter().map(|d| d.product.description.clone()));
        fields
    }

    fn matches_category(&self, category: AuthorityFilter) -> bool {
        match category {
            AuthorityFilter::WithAuthority => self.authority.is_some(),
            AuthorityFilter::WithoutAuthority => self.authority.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterState, filtered_view};
    use serde_json::json;

    fn sales() -> Vec<Sale> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "date": "2026-03-01T10:00:00Z",
                "client": {"dni": "30123456", "name": "Juana Molina"},
                "authority": {"dni": "20111222", "name": "Comisario Pérez"},
                "details": [
                    {"product": {"id": 1, "description": "Whisky"}, "quantity": 2, "subtotal": 20.0}
                ],
                "total": 20.0
            },
            {
                "id": 2,
                "date": "2026-03-02T10:00:00Z",
                "client": {"dni": "31999888", "name": "Luis Alberto"},
                "total": 0.0
            }
        ]))
        .expect("valid sales json")
    }

    #[test]
    fn text_filter_reaches_nested_references() {
        let sales = sales();
        let by_product = filtered_view(&sales, &FilterState::new("whisky", None));
        assert_eq!(by_product.len(), 1);
        let by_client_dni = filtered_view(&sales, &FilterState::new("31999", None));
        assert_eq!(by_client_dni[0].id.get(), 2);
    }

    #[test]
    fn category_splits_on_authority_reference() {
        let sales = sales();
        let without = filtered_view(
            &sales,
            &FilterState::new("", Some(AuthorityFilter::WithoutAuthority)),
        );
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].id.get(), 2);
    }

    #[test]
    fn create_payload_omits_subtotals() {
        let payload = NewSale {
            client_dni: Dni::new("30123456").unwrap(),
            authority_dni: None,
            details: vec![NewSaleDetail {
                product_id: ProductId::new(1).unwrap(),
                quantity: 2,
            }],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "clientDni": "30123456",
                "authorityDni": null,
                "details": [{"productId": 1, "quantity": 2}]
            })
        );
    }
}
