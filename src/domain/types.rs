//! Strongly-typed value objects used by domain entities.
//!
//! Identifiers are immutable once a record exists, so they are wrapped in
//! newtypes that can only be built through validating constructors. Once a
//! value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided identifier could not be parsed as a number.
    #[error("id must be numeric")]
    NonNumericId,
    /// Provided DNI is not 7 or 8 digits long.
    #[error("DNI must contain 7 or 8 digits")]
    InvalidDni,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
}

/// Normalizes and validates an email string.
pub fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Trims the value and maps blank input to `None`.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Macro to generate lightweight newtypes for positive, server-generated identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| TypeConstraintError::NonNumericId)?;
                Self::new(value)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ProductId, "Unique identifier for a product.");
id_newtype!(SaleId, "Unique identifier for a sale.");
id_newtype!(ZoneId, "Unique identifier for a zone.");
id_newtype!(TopicId, "Unique identifier for a thematic topic.");

/// National identity document number used as the natural key of people.
///
/// Accepts dots and surrounding whitespace on input (`"30.123.456"`) and
/// stores the bare digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dni(String);

impl Dni {
    /// Validates and normalizes a DNI string.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let digits: String = value
            .into()
            .trim()
            .chars()
            .filter(|c| *c != '.')
            .collect();
        if digits.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !(7..=8).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(TypeConstraintError::InvalidDni);
        }
        Ok(Self(digits))
    }

    /// Borrow the DNI as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Dni {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Dni {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Dni {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Dni> for String {
    fn from(value: Dni) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_reject_zero_and_garbage() {
        assert_eq!(ProductId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(
            "abc".parse::<ZoneId>(),
            Err(TypeConstraintError::NonNumericId)
        );
        assert_eq!(" 7 ".parse::<SaleId>().map(SaleId::get), Ok(7));
    }

    #[test]
    fn dni_strips_dots_and_checks_length() {
        let dni = Dni::new(" 30.123.456 ").expect("valid dni");
        assert_eq!(dni.as_str(), "30123456");
        assert_eq!(Dni::new("12345"), Err(TypeConstraintError::InvalidDni));
        assert_eq!(Dni::new("1234567a"), Err(TypeConstraintError::InvalidDni));
        assert_eq!(Dni::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            normalize_email(" Boss@Garrison.ORG "),
            Ok("boss@garrison.org".to_string())
        );
        assert_eq!(
            normalize_email("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }
}
