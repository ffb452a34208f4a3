mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn register_login_logout_token_lifecycle() {
    let app = common::spawn_app().await;

    let (user_id, token) = app.register("ruth", "senior").await;
    let (status, me) = app.get("/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"].as_i64().unwrap() as i32, user_id);
    assert_eq!(me["role"], "senior");
    assert!(me.get("password_hash").is_none());

    // One token per user: login hands back the same key.
    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": "ruth", "password": common::PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"].as_str().unwrap(), token);

    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": "ruth", "password": "not the password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    // Logout invalidates the token for every protected route.
    let (status, _) = app.post_empty("/auth/logout", &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get("/users/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn mismatched_passwords_reject_without_creating_the_account() {
    let app = common::spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "harold",
                "email": "harold@example.org",
                "password": "one password",
                "password2": "another password",
                "first_name": "Harold",
                "last_name": "Nkosi",
                "role": "senior",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    // The username is still free, so the failed attempt wrote nothing.
    app.register("harold", "senior").await;
}

#[tokio::test]
async fn unknown_role_and_duplicate_username_are_validation_errors() {
    let app = common::spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "pat",
                "email": "pat@example.org",
                "password": common::PASSWORD,
                "password2": common::PASSWORD,
                "first_name": "Pat",
                "last_name": "Reyes",
                "role": "overlord",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    app.register("pearl", "senior").await;
    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "pearl",
                "email": "other-pearl@example.org",
                "password": common::PASSWORD,
                "password2": common::PASSWORD,
                "first_name": "Pearl",
                "last_name": "Okafor",
                "role": "senior",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn protected_routes_reject_missing_garbage_and_misprefixed_tokens() {
    let app = common::spawn_app().await;
    let (_, token) = app.register("frank", "caretaker").await;

    let (status, body) = app.request("GET", "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app.get("/users/me", "0000deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Only the `Token` scheme is understood.
    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_accounts_lose_access_until_reactivated() {
    let app = common::spawn_app().await;
    let (senior_id, senior_token) = app.register("gloria", "senior").await;
    let (_, admin_token) = app.register("dispatch", "senior_admin").await;

    // Only admin roles may flip the flag.
    let (status, body) = app
        .post_empty(&format!("/users/{senior_id}/deactivate"), &senior_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = app
        .post_empty(&format!("/users/{senior_id}/deactivate"), &admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    // The existing token stops working and login is refused.
    let (status, _) = app.get("/users/me", &senior_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let login = json!({"username": "gloria", "password": common::PASSWORD});
    let (status, _) = app
        .request("POST", "/auth/login", None, Some(login.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post_empty(&format!("/users/{senior_id}/activate"), &admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request("POST", "/auth/login", None, Some(login)).await;
    assert_eq!(status, StatusCode::OK);
}
