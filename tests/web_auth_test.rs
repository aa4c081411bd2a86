//! Session and registration flows through the full router.

mod common;

use axum::http::{StatusCode, header};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn unauthenticated_access_redirects_to_login() {
    let app = test_app(ScriptedQuotes::new());

    let response = app.oneshot(get_request("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        location.starts_with("/login"),
        "should redirect to /login, got: {location}"
    );
}

#[tokio::test]
async fn login_page_accessible_without_auth() {
    let app = test_app(ScriptedQuotes::new());

    let response = app.oneshot(get_request("/login", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Login"));
}

#[tokio::test]
async fn register_logs_user_in() {
    let app = test_app(ScriptedQuotes::new());

    let cookie = register(&app, "alice", "hunter2").await;
    assert!(!cookie.is_empty(), "registration should set a session cookie");

    let response = app
        .oneshot(get_request("/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Portfolio"));
}

#[tokio::test]
async fn register_rejects_mismatched_confirmation() {
    let app = test_app(ScriptedQuotes::new());

    let response = app
        .clone()
        .oneshot(form_request(
            "/register",
            "username=alice&password=hunter2&confirmation=hunter3",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("do not match"));
}

#[tokio::test]
async fn register_rejects_blank_username() {
    let app = test_app(ScriptedQuotes::new());

    let response = app
        .oneshot(form_request(
            "/register",
            "username=&password=hunter2&confirmation=hunter2",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("username"));
}

#[tokio::test]
async fn duplicate_username_rejected_and_first_account_still_works() {
    let app = test_app(ScriptedQuotes::new());

    register(&app, "alice", "hunter2").await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/register",
            "username=alice&password=other&confirmation=other",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("already taken"));

    // the first account's credentials are untouched
    let response = app
        .oneshot(form_request(
            "/login",
            "username=alice&password=hunter2",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn login_with_correct_credentials_redirects_home() {
    let app = test_app(ScriptedQuotes::new());
    register(&app, "alice", "hunter2").await;

    let response = app
        .oneshot(form_request(
            "/login",
            "username=alice&password=hunter2",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(location, "/");
    assert!(!extract_cookies(&response).is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_shows_error() {
    let app = test_app(ScriptedQuotes::new());
    register(&app, "alice", "hunter2").await;

    let response = app
        .oneshot(form_request(
            "/login",
            "username=alice&password=wrong",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_string(response)
            .await
            .contains("Invalid username or password")
    );
}

#[tokio::test]
async fn login_with_missing_password_is_forbidden() {
    let app = test_app(ScriptedQuotes::new());

    let response = app
        .oneshot(form_request("/login", "username=alice&password=", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_string(response).await.contains("must provide a password"));
}

#[tokio::test]
async fn logout_destroys_session() {
    let app = test_app(ScriptedQuotes::new());
    let cookie = register(&app, "alice", "hunter2").await;

    let response = app
        .clone()
        .oneshot(get_request("/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(location, "/login");

    let response = app
        .oneshot(get_request("/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}
