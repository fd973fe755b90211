#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use quizsync_api::app::{build_router, build_state};
use quizsync_api::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

pub fn secret() -> String {
    STANDARD.encode(KEY)
}

pub fn app() -> Router {
    let secret = secret();
    let config = Config::from_vars(|key| match key {
        "JWT_SECRET" => Some(secret.clone()),
        _ => None,
    })
    .expect("config");
    let state = build_state(&config).expect("state");
    build_router(state, &config)
}

/// Sign `claims` with `key`, adding `exp` relative to now.
pub fn token_with_key(key: &[u8], mut claims: Value, expires_in_secs: i64) -> String {
    claims["exp"] = json!(Utc::now().timestamp() + expires_in_secs);
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key),
    )
    .expect("sign token")
}

pub fn token(claims: Value, expires_in_secs: i64) -> String {
    token_with_key(KEY, claims, expires_in_secs)
}

pub async fn get(
    app: Router,
    uri: &str,
    authorization: Option<&str>,
) -> (StatusCode, Response<Body>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .expect("response");
    (response.status(), response)
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
