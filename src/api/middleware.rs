use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;
use tracing::error;

use crate::entities::{auth_token, prelude::*, user};

/// The authenticated caller, injected into request extensions by
/// `auth_middleware`. Role travels with the id so handlers can dispatch on it
/// without a second lookup.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i32,
    pub role: user::Role,
}

pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    mut request: Request,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "));

    let Some(key) = key else {
        return unauthorized("Missing or malformed Authorization header");
    };

    match AuthToken::find()
        .filter(auth_token::Column::Key.eq(key))
        .find_also_related(User)
        .one(&db)
        .await
    {
        Ok(Some((_, Some(account)))) if account.is_active => {
            request.extensions_mut().insert(CurrentUser {
                id: account.id,
                role: account.role,
            });
            next.run(request).await
        }
        Ok(Some(_)) => unauthorized("User inactive or deleted"),
        Ok(None) => unauthorized("Invalid token"),
        Err(e) => {
            error!("token lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal", "message": "Internal server error"})),
            )
                .into_response()
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "message": message})),
    )
        .into_response()
}
