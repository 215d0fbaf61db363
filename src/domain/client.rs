use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Dni, SaleId};
use crate::domain::{Entity, optional};
use crate::filter::{CategoryOption, Filterable};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Sales made to this client, as embedded by the backend.
    #[serde(default)]
    pub purchases: Vec<PurchaseSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub id: SaleId,
    pub total: f64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Payload for `POST /clients`. The DNI is the user-supplied natural key.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Payload for `PUT /clients/{dni}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseFilter {
    WithPurchases,
    WithoutPurchases,
}

impl CategoryOption for PurchaseFilter {
    fn all() -> &'static [Self] {
        &[PurchaseFilter::WithPurchases, PurchaseFilter::WithoutPurchases]
    }

    fn key(&self) -> &'static str {
        match self {
            PurchaseFilter::WithPurchases => "with",
            PurchaseFilter::WithoutPurchases => "without",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PurchaseFilter::WithPurchases => "With purchases",
            PurchaseFilter::WithoutPurchases => "Without purchases",
        }
    }
}

impl Entity for Client {
    type Id = Dni;

    const COLUMNS: &'static [&'static str] = &["DNI", "Name", "Email", "Address", "Phone", "Purchases"];

    fn id(&self) -> Dni {
        self.dni.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.dni.to_string(),
            self.name.clone(),
            self.email.clone(),
            optional(&self.address),
            optional(&self.phone),
            self.purchases.len().to_string(),
        ]
    }
}

impl Filterable for Client {
    type Category = PurchaseFilter;

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.dni.to_string(),
            self.name.clone(),
            self.email.clone(),
            optional(&self.address),
        ]
    }

    fn matches_category(&self, category: PurchaseFilter) -> bool {
        match category {
            PurchaseFilter::WithPurchases => !self.purchases.is_empty(),
            PurchaseFilter::WithoutPurchases => self.purchases.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_purchases_default_to_empty() {
        let client: Client = serde_json::from_value(json!({
            "dni": "30123456",
            "name": "Juana Molina",
            "email": "juana@example.com"
        }))
        .expect("valid client json");

        assert!(client.matches_category(PurchaseFilter::WithoutPurchases));
        assert!(!client.matches_category(PurchaseFilter::WithPurchases));
    }

    #[test]
    fn update_payload_never_carries_the_dni() {
        let update = UpdateClient {
            name: "Juana".into(),
            email: "juana@example.com".into(),
            address: None,
            phone: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("dni").is_none());
    }
}
