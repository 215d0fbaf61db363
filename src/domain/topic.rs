use serde::{Deserialize, Serialize};

use crate::domain::Entity;
use crate::domain::types::TopicId;
use crate::filter::{Filterable, NoCategory};

/// Thematic tag attached to partners and decrees.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub description: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopic {
    pub description: String,
}

impl Entity for Topic {
    type Id = TopicId;

    const COLUMNS: &'static [&'static str] = &["Id", "Description"];

    fn id(&self) -> TopicId {
        self.id
    }

    fn display_name(&self) -> String {
        self.description.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.description.clone()]
    }
}

impl Filterable for Topic {
    type Category = NoCategory;

    fn search_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.description.clone()]
    }

    fn matches_category(&self, category: NoCategory) -> bool {
        match category {}
    }
}
