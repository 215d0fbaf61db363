use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::partner::{NewPartner, Partner, UpdatePartner};
use crate::domain::types::{Dni, non_blank, normalize_email};
use crate::forms::{
    EntityForm, FieldErrors, FieldKind, FieldSpec, FormError, FormMode, check_dni,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PartnerForm {
    pub dni: String,
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters long"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(max = 200, message = "Address must be at most 200 characters long"))]
    pub address: String,
    #[validate(length(max = 30, message = "Phone must be at most 30 characters long"))]
    pub phone: String,
}

impl EntityForm for PartnerForm {
    type Item = Partner;
    type Create = NewPartner;
    type Update = UpdatePartner;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("dni", "DNI", FieldKind::Text).identity(),
        FieldSpec::new("name", "Name", FieldKind::Text).required(),
        FieldSpec::new("email", "Email", FieldKind::Email).required(),
        FieldSpec::new("address", "Address", FieldKind::Text),
        FieldSpec::new("phone", "Phone", FieldKind::Text),
    ];

    fn from_item(item: &Partner) -> Self {
        Self {
            dni: item.dni.to_string(),
            name: item.name.clone(),
            email: item.email.clone(),
            address: item.address.clone().unwrap_or_default(),
            phone: item.phone.clone().unwrap_or_default(),
        }
    }

    fn check_extra(&self, _mode: FormMode, errors: &mut FieldErrors) {
        check_dni(errors, "dni", &self.dni);
    }

    fn to_create(&self) -> Result<NewPartner, FormError> {
        self.ensure_valid(FormMode::Create)?;
        Ok(NewPartner {
            dni: Dni::new(self.dni.as_str())?,
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
            address: non_blank(&self.address),
            phone: non_blank(&self.phone),
        })
    }

    fn to_update(&self) -> Result<UpdatePartner, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        Ok(UpdatePartner {
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
            address: non_blank(&self.address),
            phone: non_blank(&self.phone),
        })
    }
}
