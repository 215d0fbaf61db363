use serde::{Deserialize, Serialize};

use crate::domain::types::{Dni, ZoneId};
use crate::domain::Entity;
use crate::filter::{CategoryOption, Filterable};

/// Highest rank an authority can hold.
pub const MAX_RANK: u8 = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Authority {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    pub rank: u8,
    #[serde(default)]
    pub zone: Option<ZoneRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRef {
    pub id: ZoneId,
    pub name: String,
}

/// Payload for `POST /authorities`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthority {
    pub dni: Dni,
    pub name: String,
    pub email: String,
    pub rank: u8,
    pub zone_id: Option<ZoneId>,
}

/// Payload for `PUT /authorities/{dni}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthority {
    pub name: String,
    pub email: String,
    pub rank: u8,
    pub zone_id: Option<ZoneId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneAssignment {
    Assigned,
    Unassigned,
}

impl CategoryOption for ZoneAssignment {
    fn all() -> &'static [Self] {
        &[ZoneAssignment::Assigned, ZoneAssignment::Unassigned]
    }

    fn key(&self) -> &'static str {
        match self {
            ZoneAssignment::Assigned => "assigned",
            ZoneAssignment::Unassigned => "unassigned",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ZoneAssignment::Assigned => "With zone",
            ZoneAssignment::Unassigned => "Without zone",
        }
    }
}

impl Entity for Authority {
    type Id = Dni;

    const COLUMNS: &'static [&'static str] = &["DNI", "Name", "Email", "Rank", "Zone"];

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
            self.rank.to_string(),
            self.zone.as_ref().map(|z| z.name.clone()).unwrap_or_default(),
        ]
    }
}

impl Filterable for Authority {
    type Category = ZoneAssignment;

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.dni.to_string(), self.name.clone(), self.email.clone()];
        if let Some(zone) = &self.zone {
            fields.push(zone.name.clone());
        }
        fields
    }

    fn matches_category(&self, category: ZoneAssignment) -> bool {
        match category {
            ZoneAssignment::Assigned => self.zone.is_some(),
            ZoneAssignment::Unassigned => self.zone.is_none(),
        }
    }
}
