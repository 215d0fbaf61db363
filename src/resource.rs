//! One marker type per REST resource, tying an entity to its payloads, its
//! form model, its endpoint and its screen behaviour.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::Entity;
use crate::domain::administrator::{Administrator, NewAdministrator, UpdateAdministrator};
use crate::domain::authority::{Authority, NewAuthority, UpdateAuthority};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::partner::{NewPartner, Partner, UpdatePartner};
use crate::domain::product::{NewProduct, Product, ProductPatch, UpdateProduct};
use crate::domain::sale::{NewSale, Sale, UpdateSale};
use crate::domain::topic::{NewTopic, Topic, UpdateTopic};
use crate::domain::types::{Dni, ProductId, SaleId, TopicId, ZoneId};
use crate::domain::zone::{NewZone, UpdateZone, Zone, ZonePatch};
use crate::filter::{FilterMode, Filterable};
use crate::forms::{EntityForm, FieldErrors};
use crate::forms::administrator::AdministratorForm;
use crate::forms::authority::AuthorityForm;
use crate::forms::client::ClientForm;
use crate::forms::partner::PartnerForm;
use crate::forms::product::ProductForm;
use crate::forms::sale::SaleForm;
use crate::forms::topic::TopicForm;
use crate::forms::zone::ZoneForm;

/// A backend collection exposed as a CRUD screen.
pub trait Resource: Send + Sync + 'static {
    type Id: Clone + Debug + Display + FromStr + PartialEq + Send + Sync + 'static;
    type Item: Entity<Id = Self::Id>
        + Filterable
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Create: Serialize + Debug + Send + Sync + 'static;
    type Update: Serialize + Debug + Send + Sync + 'static;
    type Form: EntityForm<Item = Self::Item, Create = Self::Create, Update = Self::Update>;

    /// Collection path relative to the API base, without slashes.
    const PATH: &'static str;
    /// Plural title of the screen.
    const LABEL: &'static str;
    /// Singular noun used in notifications.
    const SINGULAR: &'static str;
    const FILTER_MODE: FilterMode = FilterMode::Immediate;
    /// Form control blamed when the backend answers 409.
    const CONFLICT_FIELD: Option<&'static str> = None;

    /// Client-side veto evaluated before a delete request is issued.
    fn delete_guard(_item: &Self::Item) -> Result<(), String> {
        Ok(())
    }

    /// Rules an edit must satisfy given the record as loaded.
    fn check_edit(_item: &Self::Item, _form: &Self::Form, _errors: &mut FieldErrors) {}
}

/// Resources whose endpoint accepts partial updates through PATCH.
pub trait Patchable: Resource {
    type Patch: Serialize + Debug + Send + Sync + 'static;
}

pub struct Products;
pub struct Clients;
pub struct Sales;
pub struct Authorities;
pub struct Zones;
pub struct Partners;
pub struct Topics;
pub struct Administrators;

impl Resource for Products {
    type Id = ProductId;
    type Item = Product;
    type Create = NewProduct;
    type Update = UpdateProduct;
    type Form = ProductForm;

    const PATH: &'static str = "products";
    const LABEL: &'static str = "Products";
    const SINGULAR: &'static str = "product";
    const FILTER_MODE: FilterMode = FilterMode::Deferred;
}

impl Patchable for Products {
    type Patch = ProductPatch;
}

impl Resource for Clients {
    type Id = Dni;
    type Item = Client;
    type Create = NewClient;
    type Update = UpdateClient;
    type Form = ClientForm;

    const PATH: &'static str = "clients";
    const LABEL: &'static str = "Clients";
    const SINGULAR: &'static str = "client";
    const CONFLICT_FIELD: Option<&'static str> = Some("dni");
}

impl Resource for Sales {
    type Id = SaleId;
    type Item = Sale;
    type Create = NewSale;
    type Update = UpdateSale;
    type Form = SaleForm;

    const PATH: &'static str = "sales";
    const LABEL: &'static str = "Sales";
    const SINGULAR: &'static str = "sale";
}

impl Resource for Authorities {
    type Id = Dni;
    type Item = Authority;
    type Create = NewAuthority;
    type Update = UpdateAuthority;
    type Form = AuthorityForm;

    const PATH: &'static str = "authorities";
    const LABEL: &'static str = "Authorities";
    const SINGULAR: &'static str = "authority";
    const CONFLICT_FIELD: Option<&'static str> = Some("dni");
}

impl Resource for Zones {
    type Id = ZoneId;
    type Item = Zone;
    type Create = NewZone;
    type Update = UpdateZone;
    type Form = ZoneForm;

    const PATH: &'static str = "zones";
    const LABEL: &'static str = "Zones";
    const SINGULAR: &'static str = "zone";
    const FILTER_MODE: FilterMode = FilterMode::Deferred;
    const CONFLICT_FIELD: Option<&'static str> = Some("name");

    fn delete_guard(zone: &Zone) -> Result<(), String> {
        if zone.is_headquarters {
            Err(format!(
                "Zone \"{}\" is the headquarters and cannot be deleted. Promote another zone to headquarters first.",
                zone.name
            ))
        } else {
            Ok(())
        }
    }

    /// The headquarters flag only moves through promotion.
    fn check_edit(zone: &Zone, form: &ZoneForm, errors: &mut FieldErrors) {
        if form.is_headquarters == zone.is_headquarters {
            return;
        }
        let message = if zone.is_headquarters {
            "The headquarters zone stays headquarters until another zone is promoted"
        } else {
            "Use Promote to make this zone the headquarters"
        };
        errors.insert("is_headquarters".to_string(), message.to_string());
    }
}

impl Patchable for Zones {
    type Patch = ZonePatch;
}

impl Resource for Partners {
    type Id = Dni;
    type Item = Partner;
    type Create = NewPartner;
    type Update = UpdatePartner;
    type Form = PartnerForm;

    const PATH: &'static str = "partners";
    const LABEL: &'static str = "Partners";
    const SINGULAR: &'static str = "partner";
    const CONFLICT_FIELD: Option<&'static str> = Some("dni");
}

impl Resource for Topics {
    type Id = TopicId;
    type Item = Topic;
    type Create = NewTopic;
    type Update = UpdateTopic;
    type Form = TopicForm;

    const PATH: &'static str = "topics";
    const LABEL: &'static str = "Topics";
    const SINGULAR: &'static str = "topic";
    const CONFLICT_FIELD: Option<&'static str> = Some("description");
}

impl Resource for Administrators {
    type Id = Dni;
    type Item = Administrator;
    type Create = NewAdministrator;
    type Update = UpdateAdministrator;
    type Form = AdministratorForm;

    const PATH: &'static str = "admins";
    const LABEL: &'static str = "Administrators";
    const SINGULAR: &'static str = "administrator";
    const CONFLICT_FIELD: Option<&'static str> = Some("email");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, hq: bool) -> Zone {
        Zone {
            id: ZoneId::new(1).unwrap(),
            name: name.to_string(),
            description: None,
            is_headquarters: hq,
        }
    }

    #[test]
    fn headquarters_zone_is_protected_by_name() {
        let err = Zones::delete_guard(&zone("Central", true)).unwrap_err();
        assert!(err.contains("Central"));
        assert!(Zones::delete_guard(&zone("Norte", false)).is_ok());
    }

    #[test]
    fn other_resources_have_no_delete_veto() {
        let topic = Topic {
            id: TopicId::new(1).unwrap(),
            description: "Smuggling".into(),
        };
        assert!(Topics::delete_guard(&topic).is_ok());
    }
}
