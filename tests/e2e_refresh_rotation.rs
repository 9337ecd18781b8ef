use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::LOCATION};
use chrono::Duration;
use tower::util::ServiceExt as _;
use url::Url;

mod support;

const REDIRECT_URI: &str = "https://claude.ai/oauth/callback";

/// Full code flow, returning the first access/refresh pair.
async fn obtain_token_pair(app: &support::TestApp) -> (String, String) {
    let uri = format!(
        "/auth/authorize?response_type=code&client_id={}&redirect_uri={}",
        support::TEST_CLIENT_ID,
        urlencoded(REDIRECT_URI),
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp.headers()[LOCATION].to_str().unwrap();
    let code = Url::parse(location)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .unwrap();

    let body = serde_urlencoded::to_string([
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
        ("redirect_uri", REDIRECT_URI),
        ("client_id", support::TEST_CLIENT_ID),
    ])
    .unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let (status, json) = support::response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    (
        json["access_token"].as_str().unwrap().to_string(),
        json["refresh_token"].as_str().unwrap().to_string(),
    )
}

fn urlencoded(value: &str) -> String {
    serde_urlencoded::to_string([("k", value)])
        .unwrap()
        .trim_start_matches("k=")
        .to_string()
}

async fn post_refresh(app: &support::TestApp, params: &[(&str, &str)]) -> axum::response::Response {
    let body = serde_urlencoded::to_string(params).unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/refresh")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn rotation_yields_a_new_pair_and_invalidates_the_old_token() {
    let app = support::make_test_app().await;
    let (_access, refresh_token) = obtain_token_pair(&app).await;

    let resp = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    let (status, json) = support::response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    let rotated = json["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh_token, "rotation must mint a distinct token");

    // The consumed token is gone for good.
    let replay = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    support::assert_error_response(replay, StatusCode::BAD_REQUEST, "invalid_grant").await;

    // The replacement works.
    let again = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", rotated.as_str()),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn client_mismatch_is_invalid_client_and_keeps_the_token_alive() {
    let app = support::make_test_app().await;
    let (_access, refresh_token) = obtain_token_pair(&app).await;

    let resp = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", "mallory"),
        ],
    )
    .await;
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_client").await;

    // Probing with a wrong client id must not burn the legitimate token.
    let legit = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    assert_eq!(legit.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_refresh_token_is_invalid_grant() {
    let app = support::make_test_app().await;
    let (_access, refresh_token) = obtain_token_pair(&app).await;

    // Past the thirty-day lifetime.
    app.clock.advance(Duration::days(31));

    let resp = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn unknown_refresh_token_is_invalid_grant() {
    let app = support::make_test_app().await;

    let resp = post_refresh(
        &app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", "deadbeef"),
            ("client_id", support::TEST_CLIENT_ID),
        ],
    )
    .await;
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn the_token_endpoint_also_accepts_the_refresh_grant() {
    let app = support::make_test_app().await;
    let (_access, refresh_token) = obtain_token_pair(&app).await;

    let body = serde_urlencoded::to_string([
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token.as_str()),
        ("client_id", support::TEST_CLIENT_ID),
    ])
    .unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();

    let (status, json) = support::response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);
}

#[tokio::test]
async fn refresh_endpoint_rejects_other_grant_types() {
    let app = support::make_test_app().await;

    let resp = post_refresh(
        &app,
        &[("grant_type", "authorization_code"), ("code", "whatever")],
    )
    .await;
    support::assert_error_response(resp, StatusCode::BAD_REQUEST, "unsupported_grant_type").await;
}
