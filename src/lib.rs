//! Server-rendered administration console for the Garrison backend.
//!
//! The `data` feature holds the backend-agnostic layer (entities, forms,
//! filtering, export). The `server` feature adds the REST transport, the
//! resource screens and the actix-web front end.

pub mod domain;
pub mod dto;
pub mod export;
pub mod filter;
pub mod forms;
pub mod pagination;
pub mod resource;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod screen;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::auth::UnauthorizedPolicy;
    use crate::backend::http::HttpTransport;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::resource::{Administrators, Authorities, Clients, Partners, Sales, Topics};
    use crate::routes::dashboard::show_dashboard;
    use crate::routes::resource::{products_scope, resource_scope, zones_scope};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let transport = HttpTransport::new(&server_config.backend_url, &server_config.api_prefix)
            .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;
        log::info!("Forwarding API calls to {}", transport.base_url());

        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

        let message_store = CookieMessageStore::builder(secret_key).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let policy = UnauthorizedPolicy::from_config(&server_config);
        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized::new(policy.clone()))
                        .service(show_dashboard)
                        .service(products_scope())
                        .service(resource_scope::<Clients>())
                        .service(resource_scope::<Sales>())
                        .service(resource_scope::<Authorities>())
                        .service(zones_scope())
                        .service(resource_scope::<Partners>())
                        .service(resource_scope::<Topics>())
                        .service(resource_scope::<Administrators>()),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(transport.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
