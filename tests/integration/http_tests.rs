//! The gate mounted as axum middleware in front of storefront routes.

use anyhow::Result;
use axum::{Router, body::Body, extract::Request, routing::get};
use http::{StatusCode, header};
use storefront_gate::middleware::{GateState, gate};
use storefront_gate::testing::ScriptedResolver;
use storefront_gate::{Gate, GateConfig, MatcherConfig, RouteMatcher};
use tower::ServiceExt;

use crate::common::{jwt_resolver, session_token};

fn storefront() -> Router {
    let state = GateState::new(Gate::default(), jwt_resolver());
    Router::new()
        .route("/", get(|| async { "map" }))
        .route("/auth/sign-in", get(|| async { "sign in" }))
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/admin/users", get(|| async { "users" }))
        .route("/api/admin/orders", get(|| async { "orders" }).post(|| async { "created" }))
        .route("/favicon.ico", get(|| async { "icon" }))
        .layer(axum::middleware::from_fn_with_state(state, gate))
}

fn request(method: &str, uri: &str, token: Option<&str>) -> Request {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:3000");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("next-auth.session-token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_sign_in_page_is_public() {
    let response = storefront().oneshot(request("GET", "/auth/sign-in", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "sign in");
}

#[tokio::test]
async fn test_anonymous_dashboard_redirects() {
    let response = storefront().oneshot(request("GET", "/dashboard", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "http://localhost:3000/auth/sign-in");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_superadmin_lands_on_users() -> Result<()> {
    let token = session_token(Some("SUPERADMIN"))?;

    let landing = storefront().oneshot(request("GET", "/", Some(&token))).await?;
    assert_eq!(landing.headers()[header::LOCATION], "http://localhost:3000/admin/users");

    let users = storefront().oneshot(request("GET", "/admin/users", Some(&token))).await?;
    assert_eq!(users.status(), StatusCode::OK);
    assert_eq!(body_text(users).await, "users");
    Ok(())
}

#[tokio::test]
async fn test_post_to_admin_api_keeps_method_on_redirect() -> Result<()> {
    let token = session_token(Some("ADMINISTRATOR"))?;
    let response = storefront().oneshot(request("POST", "/api/admin/orders", Some(&token))).await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "http://localhost:3000/dashboard");
    Ok(())
}

#[tokio::test]
async fn test_favicon_bypasses_gate() {
    let response = storefront().oneshot(request("GET", "/favicon.ico", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_from_config_uses_configured_matcher() -> Result<()> {
    let config = GateConfig::builder()
        .matcher(MatcherConfig::builder().exclude_prefixes(vec![]).build())
        .build();
    let state = GateState::from_config(&config, jwt_resolver())?;
    let app = Router::new()
        .route("/favicon.ico", get(|| async { "icon" }))
        .layer(axum::middleware::from_fn_with_state(state, gate));

    let response = app.oneshot(request("GET", "/favicon.ico", None)).await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    Ok(())
}

#[tokio::test]
async fn test_with_matcher_overrides_default() {
    let matcher = MatcherConfig::builder().exclude_prefixes(vec!["/dashboard".to_string()]).build();
    let state =
        GateState::new(Gate::default(), jwt_resolver()).with_matcher(RouteMatcher::new(&matcher));
    let app = Router::new()
        .route("/dashboard", get(|| async { "dashboard" }))
        .layer(axum::middleware::from_fn_with_state(state, gate));

    let response = app.oneshot(request("GET", "/dashboard", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn admin_api(resolver: ScriptedResolver) -> Router {
    let state = GateState::new(Gate::default(), resolver);
    Router::new()
        .route("/auth/sign-in", get(|| async { "sign in" }))
        .route("/api/admin/{id}", get(|| async { "admin data" }))
        .route("/admin/{*rest}", get(|| async { "admin area" }))
        .route("/admin/users", get(|| async { "users" }))
        .layer(axum::middleware::from_fn_with_state(state, gate))
}

#[tokio::test]
async fn test_dot_segment_cannot_reach_admin_route() {
    let app = admin_api(ScriptedResolver::role("STAKEHOLDER"));

    let direct = app.clone().oneshot(request("GET", "/api/admin/7", None)).await.unwrap();
    assert_eq!(direct.status(), StatusCode::TEMPORARY_REDIRECT);

    let dotted = app.oneshot(request("GET", "/api/admin/..", None)).await.unwrap();
    assert_eq!(dotted.status(), StatusCode::NOT_FOUND);
    assert_ne!(body_text(dotted).await, "admin data");
}

#[tokio::test]
async fn test_dot_segment_into_public_path_routes_to_public_page() {
    let resolver = ScriptedResolver::absent();
    let app = admin_api(resolver.clone());

    let response =
        app.oneshot(request("GET", "/admin/x/../../auth/sign-in", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "sign in");
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn test_encoded_dot_segment_is_routed_normalized() {
    let app = admin_api(ScriptedResolver::role("SUPERADMIN"));

    let response =
        app.oneshot(request("GET", "/dashboard/%2e%2e/admin/users", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "users");
}

#[tokio::test]
async fn test_configured_public_origin() -> Result<()> {
    let config = GateConfig::builder().public_origin("https://shop.example").build();
    let state = GateState::from_config(&config, jwt_resolver())?;
    let app = Router::new()
        .route("/dashboard", get(|| async { "dashboard" }))
        .layer(axum::middleware::from_fn_with_state(state, gate));

    let response = app.oneshot(request("GET", "/dashboard", None)).await?;
    assert_eq!(response.headers()[header::LOCATION], "https://shop.example/auth/sign-in");
    Ok(())
}

#[test]
fn test_from_config_rejects_bad_public_origin() {
    let config = GateConfig::builder().public_origin("shop.example/app").build();
    assert!(GateState::from_config(&config, jwt_resolver()).is_err());
}
