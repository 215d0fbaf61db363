use std::net::TcpListener;

use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, HttpServer, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use serde_json::json;
use tera::Tera;

use garrison_admin::backend::http::HttpTransport;
use garrison_admin::resource::Clients;
use garrison_admin::routes::resource::{products_scope, resource_scope, zones_scope};

const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Console wired to the backend at `$backend`.
macro_rules! console {
    ($backend:expr) => {{
        let key = Key::from(&[7u8; 64]);
        let message_store = CookieMessageStore::builder(key).build();
        let messages = FlashMessagesFramework::builder(message_store).build();
        let tera = Tera::new("templates/**/*").expect("templates parse");
        let transport = HttpTransport::new($backend, "/api").expect("client builds");

        test::init_service(
            App::new()
                .wrap(messages)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(transport))
                .service(products_scope())
                .service(resource_scope::<Clients>())
                .service(zones_scope()),
        )
        .await
    }};
}

/// Starts an in-process REST backend and returns its origin.
fn fake_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
    let origin = format!("http://{}", listener.local_addr().expect("local addr"));

    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/api/products",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({"data": [
                        {"id": 1, "description": "Whisky", "price": 30.0, "stock": 10},
                        {"id": 2, "description": "Gorro", "price": 5.0, "stock": 0}
                    ]}))
                }),
            )
            .route(
                "/api/products/{id}",
                web::patch().to(|| async {
                    HttpResponse::Ok().json(json!({"data":
                        {"id": 2, "description": "Gorro", "price": 5.0, "stock": 15}
                    }))
                }),
            )
            .route(
                "/api/zones",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!([
                        {"id": 1, "name": "Central", "isHeadquarters": true},
                        {"id": 2, "name": "Norte", "isHeadquarters": false}
                    ]))
                }),
            )
            .route(
                "/api/zones/{id}",
                web::put().to(|| async {
                    HttpResponse::InternalServerError().body("unexpected PUT")
                }),
            )
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .expect("listen")
    .run();
    actix_web::rt::spawn(server);

    origin
}

async fn body_of(resp: actix_web::dev::ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

#[actix_web::test]
async fn unreachable_backend_shows_error_banner() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::get().uri("/products").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(body.contains("Could not load products."));
    assert!(body.contains("Showing 0 of 0"));
}

#[actix_web::test]
async fn new_form_lists_the_entity_fields() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::get().uri("/clients/new").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(body.contains("New client"));
    assert!(body.contains(r#"name="dni""#));
    assert!(!body.contains(r#"name="purchases""#));
}

#[actix_web::test]
async fn invalid_submission_is_rendered_back_with_errors() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::post()
        .uri("/products/add")
        .set_form([("description", ""), ("price", "-3"), ("stock", "2")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(body.contains("This field is required"));
    assert!(body.contains("Must be a number greater than or equal to 0"));
    assert!(body.contains(r#"value="2""#));
    assert!(!body.contains("Could not save"));
}

#[actix_web::test]
async fn unknown_ids_redirect_to_the_listing() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::get().uri("/zones/not-a-number").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/zones");
}

#[actix_web::test]
async fn unconfirmed_delete_asks_for_confirmation() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::post()
        .uri("/clients/30123456/delete")
        .set_form([("confirm", "false")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/clients?delete=30123456"
    );
}

#[actix_web::test]
async fn delete_link_for_a_missing_record_redirects_to_the_listing() {
    let backend = fake_backend();
    let app = console!(&backend);

    let req = test::TestRequest::get().uri("/products?delete=99").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/products");
}

#[actix_web::test]
async fn delete_link_for_a_loaded_record_opens_the_dialog() {
    let backend = fake_backend();
    let app = console!(&backend);

    let req = test::TestRequest::get().uri("/products?delete=2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(body.contains("Gorro"));
    assert!(body.contains(r#"name="confirm""#));
}

#[actix_web::test]
async fn headquarters_flag_cannot_be_unchecked_on_save() {
    let backend = fake_backend();
    let app = console!(&backend);

    // unchecked checkbox: the field is absent from the submitted form
    let req = test::TestRequest::post()
        .uri("/zones/1/save")
        .set_form([("name", "Central"), ("description", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(
        body.contains("The headquarters zone stays headquarters until another zone is promoted")
    );
    assert!(!body.contains("unexpected PUT"));
}

#[actix_web::test]
async fn stock_adjustment_patches_and_returns_to_the_listing() {
    let backend = fake_backend();
    let app = console!(&backend);

    let req = test::TestRequest::post()
        .uri("/products/2/stock")
        .set_form([("stock", "15")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/products");
}

#[actix_web::test]
async fn negative_stock_never_reaches_the_backend() {
    let app = console!(UNREACHABLE);

    let req = test::TestRequest::post()
        .uri("/products/2/stock")
        .set_form([("stock", "-1")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/products");
}
