//! Form models backing the create/edit panels of every entity screen.
//!
//! Forms keep raw user input (numbers included) as strings so that an invalid
//! submission can be shown back to the user unchanged with inline errors.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Dni, TypeConstraintError};

pub mod administrator;
pub mod authority;
pub mod client;
pub mod partner;
pub mod product;
pub mod sale;
pub mod topic;
pub mod zone;

/// Field name to the first error message reported for it.
pub type FieldErrors = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "This field is required";

#[derive(Debug, Error)]
/// Errors that can occur when converting form data into backend payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

/// Whether a form is creating a new record or editing a loaded one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
}

/// Input control used to render a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Password,
    Checkbox,
    TextArea,
}

/// Static description of one form control.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Identity fields are fixed once the record exists and are shown read-only.
    pub identity: bool,
    /// Fields that only exist while creating (e.g. an initial password).
    pub create_only: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            identity: false,
            create_only: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self.required = true;
        self
    }

    pub const fn create_only(mut self) -> Self {
        self.create_only = true;
        self
    }

    pub fn applies_to(&self, mode: FormMode) -> bool {
        !(self.create_only && mode == FormMode::Edit)
    }
}

/// Form model bound to one entity type.
pub trait EntityForm:
    Validate + Default + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Item;
    type Create;
    type Update;

    const FIELDS: &'static [FieldSpec];

    /// Populates the form from the current values of a loaded record.
    fn from_item(item: &Self::Item) -> Self;

    /// Rules the derive cannot express: numeric bounds, identifiers, line syntax.
    fn check_extra(&self, _mode: FormMode, _errors: &mut FieldErrors) {}

    fn to_create(&self) -> Result<Self::Create, FormError>;

    fn to_update(&self) -> Result<Self::Update, FormError>;

    /// Collects every local validation error for the given mode.
    fn field_errors(&self, mode: FormMode) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => collect_field_errors(&err),
        };
        self.check_extra(mode, &mut errors);

        let values = serde_json::to_value(self).unwrap_or_default();
        for spec in Self::FIELDS
            .iter()
            .filter(|spec| spec.required && spec.applies_to(mode))
        {
            let blank = match values.get(spec.name) {
                Some(serde_json::Value::String(s)) => s.trim().is_empty(),
                Some(serde_json::Value::Null) | None => true,
                Some(_) => false,
            };
            if blank {
                errors.insert(spec.name.to_string(), REQUIRED_MESSAGE.to_string());
            }
        }

        errors.retain(|field, _| {
            Self::FIELDS
                .iter()
                .find(|spec| spec.name == field)
                .is_none_or(|spec| spec.applies_to(mode))
        });
        errors
    }

    /// Fails with every field error when the form cannot be submitted.
    fn ensure_valid(&self, mode: FormMode) -> Result<(), FormError> {
        let errors = self.field_errors(mode);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(errors))
        }
    }
}

/// Flattens `validator` output into one message per field.
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                (field.to_string(), message)
            })
        })
        .collect()
}

fn add_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_insert_with(|| message.into());
}

/// Parses a non-negative decimal such as a price.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parses a non-negative whole number such as a stock count.
pub(crate) fn parse_count(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|v| *v >= 0)
}

pub(crate) fn check_amount(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.trim().is_empty() && parse_amount(value).is_none() {
        add_error(errors, field, "Must be a number greater than or equal to 0");
    }
}

pub(crate) fn check_count(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.trim().is_empty() && parse_count(value).is_none() {
        add_error(errors, field, "Must be a whole number greater than or equal to 0");
    }
}

pub(crate) fn check_dni(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    if let Err(err) = Dni::new(value) {
        add_error(errors, field, err.to_string());
    }
}

/// Parses an optional DNI field, treating blank input as absent.
pub(crate) fn optional_dni(value: &str) -> Result<Option<Dni>, FormError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(Dni::new(value)?))
    }
}

pub(crate) fn invalid(field: &str, message: &str) -> FormError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.to_string());
    FormError::Invalid(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_decimal_comma_and_reject_negatives() {
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount(" 0 "), Some(0.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn counts_must_be_whole_and_non_negative() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("3.5"), None);
        assert_eq!(parse_count("-2"), None);
    }

    #[test]
    fn create_only_fields_do_not_apply_when_editing() {
        let spec = FieldSpec::new("password", "Password", FieldKind::Password)
            .required()
            .create_only();
        assert!(spec.applies_to(FormMode::Create));
        assert!(!spec.applies_to(FormMode::Edit));
    }
}
