use serde::{Deserialize, Serialize};

use crate::domain::types::ZoneId;
use crate::domain::{Entity, optional};
use crate::filter::{CategoryOption, Filterable};

/// Geographic zone. Exactly one zone is flagged as headquarters at a time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_headquarters: bool,
}

/// Payload for `POST /zones`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewZone {
    pub name: String,
    pub description: Option<String>,
    pub is_headquarters: bool,
}

/// Payload for `PUT /zones/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZone {
    pub name: String,
    pub description: Option<String>,
    pub is_headquarters: bool,
}

/// Payload for `PATCH /zones/{id}`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZonePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_headquarters: Option<bool>,
}

impl ZonePatch {
    pub fn promote() -> Self {
        Self {
            is_headquarters: Some(true),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Headquarters,
    Regular,
}

impl CategoryOption for ZoneKind {
    fn all() -> &'static [Self] {
        &[ZoneKind::Headquarters, ZoneKind::Regular]
    }

    fn key(&self) -> &'static str {
        match self {
            ZoneKind::Headquarters => "hq",
            ZoneKind::Regular => "regular",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ZoneKind::Headquarters => "Headquarters",
            ZoneKind::Regular => "Regular",
        }
    }
}

impl Entity for Zone {
    type Id = ZoneId;

    const COLUMNS: &'static [&'static str] = &["Id", "Name", "Description", "Headquarters"];

    fn id(&self) -> ZoneId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            optional(&self.description),
            if self.is_headquarters { "yes" } else { "" }.to_string(),
        ]
    }
}

impl Filterable for Zone {
    type Category = ZoneKind;

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            optional(&self.description),
        ]
    }

    fn matches_category(&self, category: ZoneKind) -> bool {
        match category {
            ZoneKind::Headquarters => self.is_headquarters,
            ZoneKind::Regular => !self.is_headquarters,
        }
    }
}
