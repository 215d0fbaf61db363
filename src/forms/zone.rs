use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::non_blank;
use crate::domain::zone::{NewZone, UpdateZone, Zone};
use crate::forms::{EntityForm, FieldKind, FieldSpec, FormError, FormMode};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Create/edit panel of the zone screen.
pub struct ZoneForm {
    #[validate(length(min = 2, max = 60, message = "Name must be 2 to 60 characters long"))]
    pub name: String,
    #[validate(length(max = 300, message = "Description must be at most 300 characters long"))]
    pub description: String,
    pub is_headquarters: bool,
}

impl EntityForm for ZoneForm {
    type Item = Zone;
    type Create = NewZone;
    type Update = UpdateZone;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text).required(),
        FieldSpec::new("description", "Description", FieldKind::TextArea),
        FieldSpec::new("is_headquarters", "Headquarters", FieldKind::Checkbox),
    ];

    fn from_item(item: &Zone) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            is_headquarters: item.is_headquarters,
        }
    }

    fn to_create(&self) -> Result<NewZone, FormError> {
        self.ensure_valid(FormMode::Create)?;
        Ok(NewZone {
            name: self.name.trim().to_string(),
            description: non_blank(&self.description),
            is_headquarters: self.is_headquarters,
        })
    }

    fn to_update(&self) -> Result<UpdateZone, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        Ok(UpdateZone {
            name: self.name.trim().to_string(),
            description: non_blank(&self.description),
            is_headquarters: self.is_headquarters,
        })
    }
}
