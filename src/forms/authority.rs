use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::authority::{Authority, MAX_RANK, NewAuthority, UpdateAuthority};
use crate::domain::types::{Dni, ZoneId, normalize_email};
use crate::forms::{
    EntityForm, FieldErrors, FieldKind, FieldSpec, FormError, FormMode, check_dni, invalid,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AuthorityForm {
    pub dni: String,
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters long"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    pub rank: String,
    /// Optional zone the authority is assigned to.
    pub zone_id: String,
}

const RANK_MESSAGE: &str = "Rank must be a whole number between 0 and 3";

fn parse_rank(value: &str) -> Option<u8> {
    value.trim().parse::<u8>().ok().filter(|r| *r <= MAX_RANK)
}

fn parse_zone(value: &str) -> Result<Option<ZoneId>, FormError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(value.parse::<ZoneId>()?))
}

impl AuthorityForm {
    fn parsed(&self) -> Result<(u8, Option<ZoneId>), FormError> {
        let rank = parse_rank(&self.rank).ok_or_else(|| invalid("rank", RANK_MESSAGE))?;
        Ok((rank, parse_zone(&self.zone_id)?))
    }
}

impl EntityForm for AuthorityForm {
    type Item = Authority;
    type Create = NewAuthority;
    type Update = UpdateAuthority;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("dni", "DNI", FieldKind::Text).identity(),
        FieldSpec::new("name", "Name", FieldKind::Text).required(),
        FieldSpec::new("email", "Email", FieldKind::Email).required(),
        FieldSpec::new("rank", "Rank", FieldKind::Number).required(),
        FieldSpec::new("zone_id", "Zone id", FieldKind::Number),
    ];

    fn from_item(item: &Authority) -> Self {
        Self {
            dni: item.dni.to_string(),
            name: item.name.clone(),
            email: item.email.clone(),
            rank: item.rank.to_string(),
            zone_id: item
                .zone
                .as_ref()
                .map(|z| z.id.to_string())
                .unwrap_or_default(),
        }
    }

    fn check_extra(&self, _mode: FormMode, errors: &mut FieldErrors) {
        check_dni(errors, "dni", &self.dni);
        if !self.rank.trim().is_empty() && parse_rank(&self.rank).is_none() {
            errors.insert("rank".to_string(), RANK_MESSAGE.to_string());
        }
        if parse_zone(&self.zone_id).is_err() {
            errors.insert("zone_id".to_string(), "Zone id must be a positive number".to_string());
        }
    }

    fn to_create(&self) -> Result<NewAuthority, FormError> {
        self.ensure_valid(FormMode::Create)?;
        let (rank, zone_id) = self.parsed()?;
        Ok(NewAuthority {
            dni: Dni::new(self.dni.as_str())?,
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
            rank,
            zone_id,
        })
    }

    fn to_update(&self) -> Result<UpdateAuthority, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        let (rank, zone_id) = self.parsed()?;
        Ok(UpdateAuthority {
            name: self.name.trim().to_string(),
            email: normalize_email(self.email.as_str())?,
            rank,
            zone_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_is_bounded() {
        let form = AuthorityForm {
            dni: "20111222".into(),
            name: "Comisario Pérez".into(),
            email: "perez@garrison.org".into(),
            rank: "4".into(),
            zone_id: "x".into(),
        };
        let errors = form.field_errors(FormMode::Create);
        assert_eq!(errors["rank"], RANK_MESSAGE);
        assert!(errors.contains_key("zone_id"));
    }

    #[test]
    fn update_payload_keeps_optional_zone() {
        let form = AuthorityForm {
            dni: "20111222".into(),
            name: "Comisario Pérez".into(),
            email: "perez@garrison.org".into(),
            rank: "2".into(),
            zone_id: String::new(),
        };
        let update = form.to_update().expect("valid form");
        assert_eq!(update.rank, 2);
        assert_eq!(update.zone_id, None);
    }
}
