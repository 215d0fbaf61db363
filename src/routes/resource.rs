//! Generic CRUD handlers mounted once per resource.

use actix_web::http::header;
use actix_web::{HttpResponse, Scope, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::backend::Credentials;
use crate::backend::http::HttpTransport;
use crate::domain::types::{ProductId, ZoneId};
use crate::domain::Entity;
use crate::dto::screen::{
    CategoryOf, DeleteForm, FieldView, FilterView, FormView, IndexQuery, RowView, ScreenPage,
    field_views,
};
use crate::export::{ExportFile, export_csv, export_json};
use crate::filter::{CategoryOption, FilterMode};
use crate::forms::product::StockForm;
use crate::forms::{FieldErrors, FormMode};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::resource::{Products, Resource, Zones};
use crate::routes::{base_context, redirect, render_template, unauthorized, user_transport};
use crate::screen::{Panel, ResourceScreen, ScreenError, capitalize};
use crate::services::resource::EntityService;

type Screen<R> = ResourceScreen<R, HttpTransport>;

/// Routes of one resource under `/{R::PATH}`.
pub fn resource_scope<R: Resource>() -> Scope {
    web::scope(&format!("/{}", R::PATH))
        .route("", web::get().to(index::<R>))
        .route("/", web::get().to(index::<R>))
        .route("/new", web::get().to(new_form::<R>))
        .route("/add", web::post().to(add::<R>))
        .route("/export", web::get().to(export::<R>))
        .route("/{id}", web::get().to(edit_form::<R>))
        .route("/{id}/save", web::post().to(save::<R>))
        .route("/{id}/delete", web::post().to(delete::<R>))
}

/// Product routes, including the inline stock adjustment.
pub fn products_scope() -> Scope {
    resource_scope::<Products>().route("/{id}/stock", web::post().to(adjust_stock))
}

/// Zone routes, including promotion to headquarters.
pub fn zones_scope() -> Scope {
    resource_scope::<Zones>().route("/{id}/promote", web::post().to(promote_zone))
}

fn list_url<R: Resource>() -> String {
    format!("/{}", R::PATH)
}

fn open_screen<R: Resource>(transport: &HttpTransport, credentials: Credentials) -> Screen<R> {
    ResourceScreen::new(EntityService::new(user_transport(transport, credentials)))
}

/// Restores the filter layers carried by the query string.
fn restore_filters<R: Resource>(screen: &mut Screen<R>, query: &IndexQuery) {
    let category =
        |key: &Option<String>| key.as_deref().and_then(<CategoryOf<R> as CategoryOption>::parse);

    if R::FILTER_MODE == FilterMode::Deferred {
        screen.set_filter_text(query.aq.clone().unwrap_or_default());
        screen.set_category(category(&query.acategory));
        screen.apply_filters();
    }
    screen.set_filter_text(query.q.clone().unwrap_or_default());
    screen.set_category(category(&query.category));
    if query.wants_apply() {
        screen.apply_filters();
    }
}

fn build_page<R: Resource>(screen: &Screen<R>, page: usize) -> ScreenPage {
    let rows = screen
        .view()
        .into_iter()
        .map(RowView::from_item::<R>)
        .collect::<Vec<_>>();
    let shown = rows.len();

    let form = screen.form_mode().map(|mode| {
        let (title, action) = match (mode, screen.state().panel()) {
            (FormMode::Edit, Panel::Editing(id)) => (
                format!("Edit {}", R::SINGULAR),
                format!("/{}/{}/save", R::PATH, urlencoding::encode(&id.to_string())),
            ),
            _ => (format!("New {}", R::SINGULAR), format!("/{}/add", R::PATH)),
        };
        let errors = screen.visible_errors();
        let fields = field_views(screen.form(), mode, &errors);
        let general_errors = general_errors(&errors, &fields);
        FormView {
            mode,
            title,
            action,
            fields,
            general_errors,
        }
    });

    ScreenPage {
        path: R::PATH,
        label: R::LABEL,
        singular: R::SINGULAR,
        columns: <R::Item as Entity>::COLUMNS,
        rows: Paginated::from_items(rows, page, DEFAULT_ITEMS_PER_PAGE),
        total: screen.items().len(),
        shown,
        filter: FilterView::new(screen.filter_input(), screen.applied_filter(), R::FILTER_MODE),
        filter_query: IndexQuery::filter_query(
            screen.filter_input(),
            screen.applied_filter(),
            R::FILTER_MODE,
        ),
        form,
        error: screen.error_message().map(str::to_string),
        confirm_delete: screen
            .pending_delete()
            .and_then(|id| screen.find(id))
            .map(RowView::from_item::<R>),
        can_promote: R::PATH == Zones::PATH,
        can_adjust_stock: R::PATH == Products::PATH,
    }
}

fn general_errors(errors: &FieldErrors, fields: &[FieldView]) -> Vec<String> {
    errors
        .iter()
        .filter(|(name, _)| !fields.iter().any(|field| field.name == name.as_str()))
        .map(|(_, message)| message.clone())
        .collect()
}

fn render_screen<R: Resource>(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    screen: &Screen<R>,
    page: usize,
) -> HttpResponse {
    let mut context: Context = base_context(flash_messages, R::PATH);
    context.insert("screen", &build_page::<R>(screen, page));
    let template = if screen.form_mode().is_some() {
        "resource/form.html"
    } else {
        "resource/index.html"
    };
    render_template(tera, template, &context)
}

fn parse_id<R: Resource>(raw: &str) -> Option<R::Id> {
    raw.parse::<R::Id>().ok()
}

fn unknown_record<R: Resource>(raw: &str) -> HttpResponse {
    FlashMessage::error(format!("{} \"{raw}\" was not found.", capitalize(R::SINGULAR))).send();
    redirect(&list_url::<R>())
}

pub async fn index<R: Resource>(
    query: web::Query<IndexQuery>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    let loaded = match screen.reload().await {
        Ok(()) => true,
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(_) => false,
    };
    restore_filters(&mut screen, &query);

    if let Some(raw) = &query.delete {
        let Some(id) = parse_id::<R>(raw) else {
            return unknown_record::<R>(raw);
        };
        match screen.request_delete(&id) {
            Err(ScreenError::NotLoaded(_)) if loaded => return unknown_record::<R>(raw),
            // a vetoed deletion is shown through the screen's error banner
            _ => {}
        }
    }

    render_screen(&tera, &flash_messages, &screen, query.page.unwrap_or(1))
}

pub async fn new_form<R: Resource>(
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    if let Err(err) = screen.open_create() {
        log::error!("Failed to open {} form: {err}", R::SINGULAR);
        return redirect(&list_url::<R>());
    }
    render_screen(&tera, &flash_messages, &screen, 1)
}

/// Outcome of a submitted form: redirect on success, the form again otherwise.
fn submit_outcome<R: Resource>(
    result: Result<R::Item, ScreenError>,
    screen: &Screen<R>,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
) -> HttpResponse {
    match result {
        Ok(_) => {
            if let Some(notice) = screen.notice() {
                FlashMessage::success(notice.to_string()).send();
            }
            redirect(&list_url::<R>())
        }
        Err(err) if err.is_unauthorized() => unauthorized(),
        Err(ScreenError::Invalid(_)) | Err(ScreenError::Backend(_)) => {
            render_screen(tera, flash_messages, screen, 1)
        }
        Err(err) => {
            log::error!("Failed to save {}: {err}", R::SINGULAR);
            FlashMessage::error(err.to_string()).send();
            redirect(&list_url::<R>())
        }
    }
}

pub async fn add<R: Resource>(
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<R::Form>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    if let Err(err) = screen.open_create() {
        log::error!("Failed to open {} form: {err}", R::SINGULAR);
        return redirect(&list_url::<R>());
    }
    *screen.form_mut() = form;
    let result = screen.submit().await;
    submit_outcome(result, &screen, &tera, &flash_messages)
}

/// Loads the collection and opens the edit panel for `raw`.
async fn select_record<R: Resource>(
    screen: &mut Screen<R>,
    raw: &str,
) -> Result<(), HttpResponse> {
    let Some(id) = parse_id::<R>(raw) else {
        return Err(unknown_record::<R>(raw));
    };
    match screen.reload().await {
        Ok(()) => {}
        Err(err) if err.is_unauthorized() => return Err(unauthorized()),
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return Err(redirect(&list_url::<R>()));
        }
    }
    if screen.select(&id).is_err() {
        return Err(unknown_record::<R>(raw));
    }
    Ok(())
}

pub async fn edit_form<R: Resource>(
    path: web::Path<String>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    if let Err(response) = select_record(&mut screen, &path.into_inner()).await {
        return response;
    }
    render_screen(&tera, &flash_messages, &screen, 1)
}

pub async fn save<R: Resource>(
    path: web::Path<String>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<R::Form>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    if let Err(response) = select_record(&mut screen, &path.into_inner()).await {
        return response;
    }
    *screen.form_mut() = form;
    let result = screen.submit().await;
    submit_outcome(result, &screen, &tera, &flash_messages)
}

pub async fn delete<R: Resource>(
    path: web::Path<String>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    web::Form(form): web::Form<DeleteForm>,
) -> HttpResponse {
    let raw = path.into_inner();
    let Some(id) = parse_id::<R>(&raw) else {
        return unknown_record::<R>(&raw);
    };
    if !form.confirmed() {
        return redirect(&format!(
            "{}?delete={}",
            list_url::<R>(),
            urlencoding::encode(&raw)
        ));
    }

    let mut screen = open_screen::<R>(&transport, credentials);
    match screen.reload().await {
        Ok(()) => {}
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&list_url::<R>());
        }
    }

    match screen.request_delete(&id) {
        Ok(()) => {}
        Err(ScreenError::NotLoaded(_)) => return unknown_record::<R>(&raw),
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&list_url::<R>());
        }
    }

    match screen.confirm_delete().await {
        Ok(_) => {
            if let Some(notice) = screen.notice() {
                FlashMessage::success(notice.to_string()).send();
            }
        }
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(_) => {
            let message = screen
                .error_message()
                .unwrap_or("Could not delete the record.")
                .to_string();
            FlashMessage::error(message).send();
        }
    }
    redirect(&list_url::<R>())
}

fn download(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header((header::CONTENT_DISPOSITION, file.disposition()))
        .body(file.body)
}

/// Downloads the current filtered view as CSV (default) or JSON.
pub async fn export<R: Resource>(
    query: web::Query<IndexQuery>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
) -> HttpResponse {
    let mut screen = open_screen::<R>(&transport, credentials);
    match screen.reload().await {
        Ok(()) => {}
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&list_url::<R>());
        }
    }
    restore_filters(&mut screen, &query);

    let rows = screen.view();
    let result = match query.format.as_deref() {
        Some("json") => export_json(&rows, &format!("{}.json", R::PATH)),
        _ => export_csv(&rows, &format!("{}.csv", R::PATH)),
    };

    match result {
        Ok(file) => {
            log::info!("Exported {} {}", rows.len(), R::LABEL.to_lowercase());
            download(file)
        }
        Err(err) => {
            log::error!("Failed to export {}: {err}", R::LABEL);
            FlashMessage::error(format!("Could not export {}.", R::LABEL.to_lowercase())).send();
            redirect(&list_url::<R>())
        }
    }
}

pub async fn adjust_stock(
    path: web::Path<String>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    web::Form(form): web::Form<StockForm>,
) -> HttpResponse {
    let raw = path.into_inner();
    let Ok(id) = raw.parse::<ProductId>() else {
        return unknown_record::<Products>(&raw);
    };
    let patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(err) => {
            log::warn!("Rejected stock for product {id}: {err}");
            FlashMessage::error("Stock must be a whole number greater than or equal to 0.").send();
            return redirect(&list_url::<Products>());
        }
    };

    let service = EntityService::<Products, _>::new(user_transport(&transport, credentials));
    match service.adjust_stock(&id, &patch).await {
        Ok(product) => {
            log::info!("Product {} stock set to {}", product.id, product.stock);
            FlashMessage::success(format!(
                "Stock of {} set to {}.",
                product.description, product.stock
            ))
            .send();
        }
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(err) => {
            log::error!("Failed to adjust stock of product {id}: {err}");
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| "Could not update the stock.".to_string());
            FlashMessage::error(message).send();
        }
    }
    redirect(&list_url::<Products>())
}

pub async fn promote_zone(
    path: web::Path<String>,
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
) -> HttpResponse {
    let raw = path.into_inner();
    let Ok(id) = raw.parse::<ZoneId>() else {
        return unknown_record::<Zones>(&raw);
    };

    let service = EntityService::<Zones, _>::new(user_transport(&transport, credentials));
    match service.promote_headquarters(&id).await {
        Ok(zone) => {
            log::info!("Zone {} promoted to headquarters", zone.id);
            FlashMessage::success(format!("{} is now the headquarters.", zone.name)).send();
        }
        Err(err) if err.is_unauthorized() => return unauthorized(),
        Err(err) => {
            log::error!("Failed to promote zone {id}: {err}");
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| "Could not promote the zone.".to_string());
            FlashMessage::error(message).send();
        }
    }
    redirect(&list_url::<Zones>())
}
