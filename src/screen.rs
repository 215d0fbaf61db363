//! CRUD and filtering state of one resource screen.
//!
//! A [`ResourceScreen`] owns the loaded collection, the open form, the filter
//! inputs and the tagged [`ScreenState`]. The visible rows are always derived
//! from the collection on read through [`ResourceScreen::view`].

use std::collections::BTreeSet;

use thiserror::Error;

use crate::backend::{BackendError, Transport};
use crate::domain::Entity;
use crate::dto::api::Confirmation;
use crate::dto::screen::CategoryOf;
use crate::filter::{FilterMode, FilterState, filtered_view};
use crate::forms::{EntityForm, FieldErrors, FormError, FormMode};
use crate::resource::Resource;
use crate::services::resource::{EntityService, ListParams};

/// Which form, if any, was open when an error was raised.
#[derive(Clone, Debug, PartialEq)]
pub enum Panel<Id> {
    Closed,
    Creating,
    Editing(Id),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScreenState<Id> {
    /// List shown, no form open.
    Browsing,
    Creating,
    Editing(Id),
    /// A create (`None`) or update (`Some`) is in flight.
    Saving(Option<Id>),
    /// The last operation failed. The panel stays as it was so the user can retry.
    ErrorShown { message: String, panel: Panel<Id> },
}

impl<Id: Clone> ScreenState<Id> {
    pub fn panel(&self) -> Panel<Id> {
        match self {
            ScreenState::Browsing => Panel::Closed,
            ScreenState::Creating | ScreenState::Saving(None) => Panel::Creating,
            ScreenState::Editing(id) | ScreenState::Saving(Some(id)) => Panel::Editing(id.clone()),
            ScreenState::ErrorShown { panel, .. } => panel.clone(),
        }
    }

    fn from_panel(panel: Panel<Id>) -> Self {
        match panel {
            Panel::Closed => ScreenState::Browsing,
            Panel::Creating => ScreenState::Creating,
            Panel::Editing(id) => ScreenState::Editing(id),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("a save is already in progress")]
    Busy,

    #[error("no form is open")]
    NoOpenPanel,

    #[error("record {0} is not loaded")]
    NotLoaded(String),

    #[error("{0}")]
    Rejected(String),

    #[error("no deletion is awaiting confirmation")]
    NothingToConfirm,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type ScreenResult<T> = Result<T, ScreenError>;

impl ScreenError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ScreenError::Backend(err) if err.is_unauthorized())
    }
}

pub struct ResourceScreen<R: Resource, T> {
    service: EntityService<R, T>,
    items: Vec<R::Item>,
    state: ScreenState<R::Id>,
    form: R::Form,
    touched: BTreeSet<String>,
    field_errors: FieldErrors,
    filter_input: FilterState<CategoryOf<R>>,
    filter_applied: FilterState<CategoryOf<R>>,
    pending_delete: Option<R::Id>,
    notice: Option<String>,
}

impl<R, T> ResourceScreen<R, T>
where
    R: Resource,
    T: Transport,
{
    pub fn new(service: EntityService<R, T>) -> Self {
        Self {
            service,
            items: Vec::new(),
            state: ScreenState::Browsing,
            form: Default::default(),
            touched: BTreeSet::new(),
            field_errors: FieldErrors::new(),
            filter_input: FilterState::default(),
            filter_applied: FilterState::default(),
            pending_delete: None,
            notice: None,
        }
    }

    /// Authoritative collection as last loaded.
    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn state(&self) -> &ScreenState<R::Id> {
        &self.state
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form
    }

    /// Mode of the open form, if any.
    pub fn form_mode(&self) -> Option<FormMode> {
        match self.state.panel() {
            Panel::Closed => None,
            Panel::Creating => Some(FormMode::Create),
            Panel::Editing(_) => Some(FormMode::Edit),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, ScreenState::Saving(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ScreenState::ErrorShown { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Success notification of the last mutation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&R::Id> {
        self.pending_delete.as_ref()
    }

    pub fn filter_input(&self) -> &FilterState<CategoryOf<R>> {
        &self.filter_input
    }

    pub fn applied_filter(&self) -> &FilterState<CategoryOf<R>> {
        &self.filter_applied
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    /// Errors of the current form, including ones reported by the backend.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Field errors that should be shown inline: only for touched fields.
    pub fn visible_errors(&self) -> FieldErrors {
        self.field_errors
            .iter()
            .filter(|(field, _)| self.touched.contains(*field))
            .map(|(field, message)| (field.clone(), message.clone()))
            .collect()
    }

    /// Current filtered view, recomputed from the collection and the applied filter.
    pub fn view(&self) -> Vec<&R::Item> {
        filtered_view(&self.items, &self.filter_applied)
    }

    pub fn find(&self, id: &R::Id) -> Option<&R::Item> {
        self.items.iter().find(|item| &item.id() == id)
    }

    /// Reloads the collection. A failed reload keeps the previous items.
    pub async fn reload(&mut self) -> ScreenResult<()> {
        match self.service.list(ListParams::default()).await {
            Ok(items) => {
                self.items = items;
                if let ScreenState::ErrorShown {
                    panel: Panel::Closed,
                    ..
                } = self.state
                {
                    self.state = ScreenState::Browsing;
                }
                Ok(())
            }
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                log::error!("Failed to load {}: {err}", R::LABEL);
                let fallback = format!("Could not load {}", R::LABEL.to_lowercase());
                let message = describe(&err, &fallback);
                self.state = ScreenState::ErrorShown {
                    message,
                    panel: self.state.panel(),
                };
                Err(err.into())
            }
        }
    }

    /// Opens the empty "new" form.
    pub fn open_create(&mut self) -> ScreenResult<()> {
        self.ensure_idle()?;
        self.reset_form();
        self.state = ScreenState::Creating;
        Ok(())
    }

    /// Opens the edit form populated from the row's current values.
    pub fn select(&mut self, id: &R::Id) -> ScreenResult<()> {
        self.ensure_idle()?;
        let form = self
            .find(id)
            .map(<R::Form as EntityForm>::from_item)
            .ok_or_else(|| ScreenError::NotLoaded(id.to_string()))?;
        self.reset_form();
        self.form = form;
        self.state = ScreenState::Editing(id.clone());
        Ok(())
    }

    pub fn touch(&mut self, field: &str) {
        self.touched.insert(field.to_string());
    }

    fn touch_all(&mut self, mode: FormMode) {
        for spec in <R::Form as EntityForm>::FIELDS
            .iter()
            .filter(|spec| spec.applies_to(mode))
        {
            self.touched.insert(spec.name.to_string());
        }
    }

    /// Closes the form and discards its contents.
    pub fn cancel(&mut self) -> ScreenResult<()> {
        self.ensure_idle()?;
        self.reset_form();
        self.state = ScreenState::Browsing;
        Ok(())
    }

    /// Validates and saves the open form, then reloads the list once.
    ///
    /// An invalid form touches every field and sends nothing. A failed save
    /// keeps the form contents and the collection as they were.
    pub async fn submit(&mut self) -> ScreenResult<R::Item> {
        self.ensure_idle()?;
        let panel = self.state.panel();
        let target = match &panel {
            Panel::Closed => return Err(ScreenError::NoOpenPanel),
            Panel::Creating => None,
            Panel::Editing(id) => Some(id.clone()),
        };
        let mode = if target.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        };

        let mut errors = self.form.field_errors(mode);
        if let Some(item) = target.as_ref().and_then(|id| self.find(id)) {
            R::check_edit(item, &self.form, &mut errors);
        }
        if !errors.is_empty() {
            return Err(self.reject_form(mode, errors));
        }

        let previous = self.state.clone();
        self.state = ScreenState::Saving(target.clone());
        let result = match &target {
            None => match self.form.to_create() {
                Ok(payload) => self.service.create(&payload).await,
                Err(err) => {
                    self.state = previous;
                    return Err(self.reject_form(mode, form_error_fields(err)));
                }
            },
            Some(id) => match self.form.to_update() {
                Ok(payload) => self.service.update(id, &payload).await,
                Err(err) => {
                    self.state = previous;
                    return Err(self.reject_form(mode, form_error_fields(err)));
                }
            },
        };

        match result {
            Ok(saved) => {
                let verb = if target.is_some() { "updated" } else { "created" };
                log::info!("{} {} {verb}", R::SINGULAR, saved.display_name());
                self.reset_form();
                self.state = ScreenState::Browsing;
                self.notice = Some(format!("{} {verb}.", capitalize(R::SINGULAR)));
                self.reload_after_mutation().await?;
                Ok(saved)
            }
            Err(err) if err.is_unauthorized() => {
                self.state = previous;
                Err(err.into())
            }
            Err(err) => {
                log::error!("Failed to save {}: {err}", R::SINGULAR);
                self.blame_field(&err);
                self.state = ScreenState::ErrorShown {
                    message: describe(&err, &format!("Could not save {}", R::SINGULAR)),
                    panel,
                };
                Err(err.into())
            }
        }
    }

    /// Asks for confirmation before deleting. Vetoed deletions never reach the backend.
    pub fn request_delete(&mut self, id: &R::Id) -> ScreenResult<()> {
        self.ensure_idle()?;
        let item = self
            .find(id)
            .ok_or_else(|| ScreenError::NotLoaded(id.to_string()))?;
        if let Err(message) = R::delete_guard(item) {
            self.pending_delete = None;
            self.state = ScreenState::ErrorShown {
                message: message.clone(),
                panel: self.state.panel(),
            };
            return Err(ScreenError::Rejected(message));
        }
        self.pending_delete = Some(id.clone());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the record awaiting confirmation and reloads on success.
    pub async fn confirm_delete(&mut self) -> ScreenResult<Confirmation> {
        self.ensure_idle()?;
        let id = self
            .pending_delete
            .take()
            .ok_or(ScreenError::NothingToConfirm)?;

        match self.service.delete(&id).await {
            Ok(confirmation) => {
                log::info!("{} {id} deleted", R::SINGULAR);
                self.notice = Some(
                    confirmation
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("{} deleted.", capitalize(R::SINGULAR))),
                );
                if self.state.panel() == Panel::Editing(id.clone()) {
                    self.reset_form();
                    self.state = ScreenState::Browsing;
                }
                self.reload_after_mutation().await?;
                Ok(confirmation)
            }
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                log::error!("Failed to delete {} {id}: {err}", R::SINGULAR);
                self.state = ScreenState::ErrorShown {
                    message: describe(&err, &format!("Could not delete {}", R::SINGULAR)),
                    panel: self.state.panel(),
                };
                Err(err.into())
            }
        }
    }

    /// Hides the error banner, returning to whatever panel was open.
    pub fn dismiss_error(&mut self) {
        if let ScreenState::ErrorShown { panel, .. } = &self.state {
            self.state = ScreenState::from_panel(panel.clone());
        }
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_input.text = text.into();
        self.sync_immediate();
    }

    pub fn set_category(&mut self, category: Option<CategoryOf<R>>) {
        self.filter_input.category = category;
        self.sync_immediate();
    }

    /// Makes the filter inputs take effect on deferred screens.
    pub fn apply_filters(&mut self) {
        self.filter_applied = self.filter_input.clone();
    }

    pub fn clear_filters(&mut self) {
        self.filter_input = FilterState::default();
        self.filter_applied = FilterState::default();
    }

    fn sync_immediate(&mut self) {
        if R::FILTER_MODE == FilterMode::Immediate {
            self.apply_filters();
        }
    }

    fn ensure_idle(&self) -> ScreenResult<()> {
        if self.is_busy() {
            Err(ScreenError::Busy)
        } else {
            Ok(())
        }
    }

    fn reset_form(&mut self) {
        self.form = Default::default();
        self.touched.clear();
        self.field_errors.clear();
    }

    fn reject_form(&mut self, mode: FormMode, errors: FieldErrors) -> ScreenError {
        self.touch_all(mode);
        self.field_errors = errors.clone();
        ScreenError::Invalid(errors)
    }

    /// The list reload that follows a successful mutation. Its own failure is
    /// already reflected in the state; only Unauthorized is propagated.
    async fn reload_after_mutation(&mut self) -> ScreenResult<()> {
        match self.reload().await {
            Err(err) if err.is_unauthorized() => Err(err),
            _ => Ok(()),
        }
    }

    /// Maps a rejected save onto the form control it concerns.
    fn blame_field(&mut self, err: &BackendError) {
        let field = match err {
            BackendError::Conflict(_) => R::CONFLICT_FIELD
                .or_else(|| err.message().and_then(mentioned_field::<R::Form>)),
            BackendError::NotFound(_) | BackendError::BadRequest(_) => {
                err.message().and_then(mentioned_field::<R::Form>)
            }
            _ => None,
        };
        if let Some(field) = field {
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| "Rejected by the server".to_string());
            self.touched.insert(field.to_string());
            self.field_errors.insert(field.to_string(), message);
        }
    }
}

fn form_error_fields(err: FormError) -> FieldErrors {
    match err {
        FormError::Invalid(errors) => errors,
        FormError::Validation(errors) => crate::forms::collect_field_errors(&errors),
        FormError::Constraint(err) => {
            let mut errors = FieldErrors::new();
            errors.insert("form".to_string(), err.to_string());
            errors
        }
    }
}

/// Banner text: the backend's message, or the generic fallback.
fn describe(err: &BackendError, fallback: &str) -> String {
    match (err, err.message()) {
        (BackendError::Server(_), Some(message)) => format!("{fallback}: {message}"),
        (_, Some(message)) => message.to_string(),
        _ => format!("{fallback}."),
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Form field whose name or label appears in a backend message.
///
/// The longest match wins, so `clientDni` beats `dni`.
fn mentioned_field<F: EntityForm>(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    F::FIELDS
        .iter()
        .filter_map(|spec| {
            [
                spec.name.to_string(),
                camel_case(spec.name).to_lowercase(),
                spec.label.to_lowercase(),
            ]
            .into_iter()
            .filter(|candidate| message.contains(candidate.as_str()))
            .map(|candidate| candidate.len())
            .max()
            .map(|len| (len, spec.name))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, name)| name)
}
