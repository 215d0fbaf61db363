use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use garrison_admin::auth::UnauthorizedPolicy;
use garrison_admin::middleware::RedirectUnauthorized;

fn policy() -> UnauthorizedPolicy {
    UnauthorizedPolicy::new(
        "/login",
        vec![
            "/auth/login".to_string(),
            "/auth/register".to_string(),
            "/auth/refresh".to_string(),
        ],
    )
}

#[actix_web::test]
async fn redirects_unauthorized_to_login_with_return_url() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::new(policy()))
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/products?q=whisky")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login?returnUrl=%2Fproducts%3Fq%3Dwhisky"
    );
}

#[actix_web::test]
async fn auth_endpoints_keep_their_401() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::new(policy()))
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    for uri in ["/auth/refresh", "/auth/login", "/login"] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::new(policy()))
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
