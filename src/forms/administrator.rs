use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::administrator::{Administrator, NewAdministrator, UpdateAdministrator};
use crate::domain::types::{Dni, normalize_email};
use crate::forms::{
    EntityForm, FieldErrors, FieldKind, FieldSpec, FormError, FormMode, check_dni,
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AdministratorForm {
    pub dni: String,
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters long"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Only sent when creating; never populated from a loaded record.
    #[serde(skip_serializing)]
    pub password: String,
}

impl std::fmt::Debug for AdministratorForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdministratorForm")
            .field("dni", &self.dni)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl EntityForm for AdministratorForm {
    type Item = Administrator;
    type Create = NewAdministrator;
    type Update = UpdateAdministrator;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("dni", "DNI", FieldKind::Text).identity(),
        FieldSpec::new("name", "Name", FieldKind::Text).required(),
        FieldSpec::new("email", "Email", FieldKind::Email).required(),
        FieldSpec::new("password", "Password", FieldKind::Password).create_only(),
    ];

    fn from_item(item: &Administrator) -> Self {
        Self {
            dni: item.dni.to_string(),
            name: item.name.clone(),
            email: item.email.clone(),
            password: String::new(),
        }
    }

    fn check_extra(&self, mode: FormMode, errors: &mut FieldErrors) {
        check_dni(errors, "dni", &self.dni);
        if mode == FormMode::Create && self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
            );
        }
    }

    fn to_create(&self) -> Result<NewAdministrator, FormError> {
        self.ensure_valid(FormMode::Create)?;
        Ok(NewAdministrator {
            dni: Dni::new(self.dni.as_str())?,
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
            password: self.password.clone(),
        })
    }

    fn to_update(&self) -> Result<UpdateAdministrator, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        Ok(UpdateAdministrator {
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str) -> AdministratorForm {
        AdministratorForm {
            dni: "25000111".into(),
            name: "Ana Admin".into(),
            email: "ana@garrison.org".into(),
            password: password.into(),
        }
    }

    #[test]
    fn password_only_checked_when_creating() {
        assert!(form("short").field_errors(FormMode::Create).contains_key("password"));
        assert!(form("").field_errors(FormMode::Edit).is_empty());
        assert!(form("").to_update().is_ok());
    }

    #[test]
    fn password_is_never_rendered_back() {
        let value = serde_json::to_value(form("s3cret-pass")).unwrap();
        assert!(value.get("password").is_none());
    }
}
