//! Entities managed by the console and the payloads sent to the backend.

use std::fmt::{Debug, Display};
use std::str::FromStr;

pub mod administrator;
pub mod authority;
pub mod client;
pub mod partner;
pub mod product;
pub mod sale;
pub mod topic;
pub mod types;
pub mod zone;

/// Read shape of a backend record as rendered in a listing.
pub trait Entity {
    type Id: Clone + Debug + Display + FromStr + PartialEq + Send + Sync + 'static;

    /// Column headers of the listing table.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Self::Id;

    /// Name used in notifications and confirmation prompts.
    fn display_name(&self) -> String;

    /// Cell values in the order of [`Entity::COLUMNS`].
    fn cells(&self) -> Vec<String>;
}

/// Formats a monetary amount for listings.
pub(crate) fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Renders `Option<String>` cells as an empty string when missing.
pub(crate) fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
