use serde::{Deserialize, Serialize};

use crate::domain::types::Dni;
use crate::domain::{Entity, optional};
use crate::filter::{Filterable, NoCategory};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Payload for `POST /partners`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPartner {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Payload for `PUT /partners/{dni}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartner {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Entity for Partner {
    type Id = Dni;

    const COLUMNS: &'static [&'static str] = &["DNI", "Name", "Email", "Address", "Phone"];

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
        ]
    }
}

impl Filterable for Partner {
    type Category = NoCategory;

    fn search_fields(&self) -> Vec<String> {
        vec![self.dni.to_string(), self.name.clone(), self.email.clone()]
    }

    fn matches_category(&self, category: NoCategory) -> bool {
        match category {}
    }
}
