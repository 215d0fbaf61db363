//! Derived, read-only projections of an in-memory entity collection.
//!
//! The filtered view is recomputed from the authoritative collection and the
//! current filter inputs every time it is requested. It borrows from the
//! collection and is never stored, so it cannot drift from it.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Category or status choice offered next to the text filter.
pub trait CategoryOption: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Every selectable option, in display order.
    fn all() -> &'static [Self];

    /// Stable key used in query strings.
    fn key(&self) -> &'static str;

    /// Human readable label.
    fn label(&self) -> &'static str;

    /// Looks an option up by its key.
    fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::all().iter().copied().find(|option| option.key() == key)
    }
}

/// Category type for entities that offer no category filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoCategory {}

impl CategoryOption for NoCategory {
    fn all() -> &'static [Self] {
        &[]
    }

    fn key(&self) -> &'static str {
        match *self {}
    }

    fn label(&self) -> &'static str {
        match *self {}
    }
}

/// Entities that can be narrowed down by free text and a category.
pub trait Filterable {
    type Category: CategoryOption;

    /// String-valued fields the text filter is matched against.
    fn search_fields(&self) -> Vec<String>;

    /// Whether the entity belongs to the given category.
    fn matches_category(&self, category: Self::Category) -> bool;
}

/// Whether filter inputs take effect as they are typed or on an explicit apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Immediate,
    Deferred,
}

/// Text plus optional category filter inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterState<C> {
    pub text: String,
    pub category: Option<C>,
}

impl<C> Default for FilterState<C> {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
        }
    }
}

impl<C: CategoryOption> FilterState<C> {
    pub fn new(text: impl Into<String>, category: Option<C>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// Builds the filter from raw query-string values, ignoring unknown categories.
    pub fn from_query(text: Option<&str>, category: Option<&str>) -> Self {
        Self {
            text: text.unwrap_or_default().to_string(),
            category: category.and_then(C::parse),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.category.is_none()
    }

    /// Text and category criteria combined with logical AND.
    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Filterable<Category = C>,
    {
        let needle = self.text.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        text_ok && self.category.is_none_or(|category| item.matches_category(category))
    }
}

/// Recomputes the filtered view over an already loaded collection.
pub fn filtered_view<'a, T>(items: &'a [T], filter: &FilterState<T::Category>) -> Vec<&'a T>
where
    T: Filterable,
{
    items.iter().filter(|item| filter.matches(*item)).collect()
}
