//! Shared harness for the API integration tests: the router wired to a
//! fresh in-memory SQLite database, plus JSON request helpers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use seniorcare_server::api;
use seniorcare_server::migrator::Migrator;

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// A fresh app over its own private in-memory database. The pool is pinned
/// to a single connection so the database survives for the whole test.
pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    TestApp {
        router: api::router(db.clone()),
        db,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse json body")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, Some(token), Some(body)).await
    }

    pub async fn post_empty(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request("POST", path, Some(token), None).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PATCH", path, Some(token), Some(body)).await
    }

    /// Registers an account with the given role and returns `(user_id, token)`.
    pub async fn register(&self, username: &str, role: &str) -> (i32, String) {
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.org"),
                    "password": PASSWORD,
                    "password2": PASSWORD,
                    "first_name": username,
                    "last_name": "Example",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
        let user_id = body["user"]["id"].as_i64().expect("user id") as i32;
        let token = body["token"].as_str().expect("token").to_string();
        (user_id, token)
    }

    /// Creates an NGO and returns its id. `admin_id` ties it to an ngo_admin
    /// account when given.
    pub async fn create_ngo(&self, token: &str, name: &str, admin_id: Option<i32>) -> i32 {
        let (status, body) = self
            .post(
                "/ngos",
                token,
                json!({
                    "name": name,
                    "registration_number": format!("REG-{name}"),
                    "email": format!("contact@{name}.org"),
                    "phone_number": "555-0100",
                    "address": "12 Harbor Lane",
                    "city": "Portsmouth",
                    "state": "NH",
                    "zip_code": "03801",
                    "admin_id": admin_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create ngo {name}: {body}");
        body["id"].as_i64().expect("ngo id") as i32
    }
}
