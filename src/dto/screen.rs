//! View models handed to the resource screen templates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Entity;
use crate::filter::{CategoryOption, FilterMode, FilterState, Filterable};
use crate::forms::{EntityForm, FieldErrors, FieldKind, FormMode};
use crate::pagination::Paginated;
use crate::resource::Resource;

/// Query string of the listing page.
///
/// On immediate screens `q`/`category` are the active filter. On deferred
/// screens they are the pending inputs, `aq`/`acategory` the applied filter,
/// and `apply` promotes the inputs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub aq: Option<String>,
    pub acategory: Option<String>,
    pub apply: Option<String>,
    pub page: Option<usize>,
    /// Row awaiting delete confirmation.
    pub delete: Option<String>,
    pub format: Option<String>,
}

impl IndexQuery {
    pub fn wants_apply(&self) -> bool {
        self.apply.is_some()
    }

    /// Query string reproducing the current filter, without page or dialog state.
    pub fn filter_query<C: CategoryOption>(
        input: &FilterState<C>,
        applied: &FilterState<C>,
        mode: FilterMode,
    ) -> String {
        let mut pairs = vec![("q", input.text.clone())];
        if let Some(category) = input.category {
            pairs.push(("category", category.key().to_string()));
        }
        if mode == FilterMode::Deferred {
            pairs.push(("aq", applied.text.clone()));
            if let Some(category) = applied.category {
                pairs.push(("acategory", category.key().to_string()));
            }
        }
        pairs
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Body of the delete form.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub cells: Vec<String>,
    /// Why the row cannot be deleted, if it cannot.
    pub delete_blocked: Option<String>,
}

impl RowView {
    pub fn from_item<R: Resource>(item: &R::Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.display_name(),
            cells: item.cells(),
            delete_blocked: R::delete_guard(item).err(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub key: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct FilterView {
    pub mode: FilterMode,
    pub text: String,
    pub options: Vec<OptionView>,
    pub applied_text: String,
    pub applied_category: Option<&'static str>,
    /// Inputs differ from what the table currently shows.
    pub pending: bool,
    pub active: bool,
}

impl FilterView {
    pub fn new<C: CategoryOption>(
        input: &FilterState<C>,
        applied: &FilterState<C>,
        mode: FilterMode,
    ) -> Self {
        Self {
            mode,
            text: input.text.clone(),
            options: C::all()
                .iter()
                .map(|option| OptionView {
                    key: option.key(),
                    label: option.label(),
                    selected: input.category == Some(*option),
                })
                .collect(),
            applied_text: applied.text.clone(),
            applied_category: applied.category.map(|c| c.key()),
            pending: input != applied,
            active: !applied.is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub readonly: bool,
    pub value: String,
    pub checked: bool,
    pub error: Option<String>,
}

/// Describes every control of `form` that applies to `mode`.
pub fn field_views<F: EntityForm>(form: &F, mode: FormMode, errors: &FieldErrors) -> Vec<FieldView> {
    let values = serde_json::to_value(form).unwrap_or_default();
    F::FIELDS
        .iter()
        .filter(|spec| spec.applies_to(mode))
        .map(|spec| {
            let raw = values.get(spec.name);
            FieldView {
                name: spec.name,
                label: spec.label,
                kind: spec.kind,
                required: spec.required,
                readonly: spec.identity && mode == FormMode::Edit,
                value: match raw {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                },
                checked: raw.and_then(Value::as_bool).unwrap_or(false),
                error: errors.get(spec.name).cloned(),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct FormView {
    pub mode: FormMode,
    pub title: String,
    /// Where the form posts to.
    pub action: String,
    pub fields: Vec<FieldView>,
    /// Errors not tied to a visible control.
    pub general_errors: Vec<String>,
}

/// Everything the listing and form templates need.
#[derive(Debug, Serialize)]
pub struct ScreenPage {
    pub path: &'static str,
    pub label: &'static str,
    pub singular: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Paginated<RowView>,
    /// Size of the loaded collection.
    pub total: usize,
    /// Size of the filtered view.
    pub shown: usize,
    pub filter: FilterView,
    pub filter_query: String,
    pub form: Option<FormView>,
    pub error: Option<String>,
    pub confirm_delete: Option<RowView>,
    pub can_promote: bool,
    pub can_adjust_stock: bool,
}

/// Category type of a resource's entity.
pub type CategoryOf<R> = <<R as Resource>::Item as Filterable>::Category;
