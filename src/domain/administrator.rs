use serde::{Deserialize, Serialize};

use crate::domain::Entity;
use crate::domain::types::Dni;
use crate::filter::{Filterable, NoCategory};

/// Console operator account. Passwords are write-only and never read back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Administrator {
    pub dni: Dni,
    pub name: String,
    pub email: String,
}

/// Payload for `POST /admins`.
#[derive(Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAdministrator {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewAdministrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAdministrator")
            .field("dni", &self.dni)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Payload for `PUT /admins/{dni}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdministrator {
    pub name: String,
    pub email: String,
}

impl Entity for Administrator {
    type Id = Dni;

    const COLUMNS: &'static [&'static str] = &["DNI", "Name", "Email"];

    fn id(&self) -> Dni {
        self.dni.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![self.dni.to_string(), self.name.clone(), self.email.clone()]
    }
}

impl Filterable for Administrator {
    type Category = NoCategory;

    fn search_fields(&self) -> Vec<String> {
        vec![self.dni.to_string(), self.name.clone(), self.email.clone()]
    }

    fn matches_category(&self, category: NoCategory) -> bool {
        match category {}
    }
}
