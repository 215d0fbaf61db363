//! HTTP handlers of the admin console.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::backend::Credentials;
use crate::backend::http::HttpTransport;
use crate::resource::{
    Administrators, Authorities, Clients, Partners, Products, Resource, Sales, Topics, Zones,
};

pub mod dashboard;
pub mod resource;

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

fn nav<R: Resource>() -> NavItem {
    NavItem {
        path: R::PATH,
        label: R::LABEL,
    }
}

/// Entries of the side navigation, in display order.
pub fn navigation() -> Vec<NavItem> {
    vec![
        nav::<Products>(),
        nav::<Clients>(),
        nav::<Sales>(),
        nav::<Authorities>(),
        nav::<Zones>(),
        nav::<Partners>(),
        nav::<Topics>(),
        nav::<Administrators>(),
    ]
}

/// Maps a flash message level to the CSS class of its banner.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, navigation and the active section.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("navigation", &navigation());
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Answer for a request the backend refused to authenticate; the
/// `RedirectUnauthorized` middleware decides what the browser sees.
pub fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().finish()
}

/// Transport acting with the credentials of the current request.
pub fn user_transport(transport: &HttpTransport, credentials: Credentials) -> HttpTransport {
    transport.with_credentials(credentials)
}
