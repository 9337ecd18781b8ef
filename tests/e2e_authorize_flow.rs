use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::LOCATION};
use tower::util::ServiceExt as _;
use url::Url;

mod support;

fn authorize_uri(query: &str) -> String {
    format!("/auth/authorize?{query}")
}

#[tokio::test]
async fn trusted_redirect_is_auto_approved_with_code_and_state() {
    let app = support::make_test_app().await;

    let uri = authorize_uri(
        "response_type=code&client_id=render_mcp_client&redirect_uri=https%3A%2F%2Fclaude.ai%2Foauth%2Fcallback&state=xyz-123",
    );
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header");
    let url = Url::parse(location).expect("redirect is a valid URL");

    assert_eq!(url.origin().ascii_serialization(), "https://claude.ai");
    assert_eq!(url.path(), "/oauth/callback");

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .expect("code query parameter");
    assert!(code.len() >= 64, "code carries full entropy: {code}");

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string());
    assert_eq!(state.as_deref(), Some("xyz-123"));
}

#[tokio::test]
async fn state_is_omitted_when_not_supplied() {
    let app = support::make_test_app().await;

    let uri = authorize_uri(
        "response_type=code&redirect_uri=https%3A%2F%2Fclaude.ai%2Foauth%2Fcallback",
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp.headers()[LOCATION].to_str().unwrap();
    let url = Url::parse(location).unwrap();
    assert!(url.query_pairs().any(|(k, _)| k == "code"));
    assert!(!url.query_pairs().any(|(k, _)| k == "state"));
}

#[tokio::test]
async fn unknown_redirect_renders_consent_form() {
    let app = support::make_test_app().await;

    let uri = authorize_uri(
        "response_type=code&client_id=some-other-client&redirect_uri=https%3A%2F%2Fexample.com%2Fcb",
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<form action=\"/auth/authorize\""));
    assert!(html.contains("name=\"auto_approve\" value=\"true\""));
    assert!(html.contains("some-other-client"));
}

#[tokio::test]
async fn consent_resubmission_with_approval_flag_is_trusted() {
    let app = support::make_test_app().await;

    let uri = authorize_uri(
        "response_type=code&client_id=some-other-client&redirect_uri=https%3A%2F%2Fexample.com%2Fcb&auto_approve=true",
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp.headers()[LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://example.com/cb?code="));
}

#[tokio::test]
async fn response_type_other_than_code_is_invalid_request() {
    let app = support::make_test_app().await;

    let uri = authorize_uri(
        "response_type=token&redirect_uri=https%3A%2F%2Fclaude.ai%2Foauth%2Fcallback",
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn missing_redirect_uri_is_invalid_request() {
    let app = support::make_test_app().await;

    let req = Request::builder()
        .uri(authorize_uri("response_type=code&client_id=render_mcp_client"))
        .body(Body::empty())
        .unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn auth_root_forwards_to_authorize_preserving_query() {
    let app = support::make_test_app().await;

    let req = Request::builder()
        .uri("/auth?response_type=code&redirect_uri=https%3A%2F%2Fclaude.ai%2Foauth%2Fcallback")
        .body(Body::empty())
        .unwrap();

    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp.headers()[LOCATION].to_str().unwrap();
    assert!(location.starts_with("/auth/authorize?response_type=code"));
}
