use actix_web::{HttpResponse, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::backend::Credentials;
use crate::backend::http::HttpTransport;
use crate::routes::{base_context, render_template, unauthorized, user_transport};
use crate::services::dashboard::load_dashboard;

#[get("/")]
pub async fn show_dashboard(
    credentials: Credentials,
    transport: web::Data<HttpTransport>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let transport = user_transport(&transport, credentials);
    let kpis = match load_dashboard(&transport).await {
        Ok(kpis) => kpis,
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            return unauthorized();
        }
    };

    let mut context = base_context(&flash_messages, "dashboard");
    context.insert("kpis", &kpis);
    render_template(&tera, "main/dashboard.html", &context)
}
