use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::topic::{NewTopic, Topic, UpdateTopic};
use crate::forms::{EntityForm, FieldKind, FieldSpec, FormError, FormMode};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TopicForm {
    #[validate(length(min = 2, max = 80, message = "Description must be 2 to 80 characters long"))]
    pub description: String,
}

impl EntityForm for TopicForm {
    type Item = Topic;
    type Create = NewTopic;
    type Update = UpdateTopic;

    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::new("description", "Description", FieldKind::Text).required()];

    fn from_item(item: &Topic) -> Self {
        Self {
            description: item.description.clone(),
        }
    }

    fn to_create(&self) -> Result<NewTopic, FormError> {
        self.ensure_valid(FormMode::Create)?;
        Ok(NewTopic {
            description: self.description.trim().to_string(),
        })
    }

    fn to_update(&self) -> Result<UpdateTopic, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        Ok(UpdateTopic {
            description: self.description.trim().to_string(),
        })
    }
}
