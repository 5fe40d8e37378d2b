//! Server-rendered page evaluations.
//!
//! Each handler runs one gate evaluation and responds with the rendering
//! document: `{"props": …}` to render, `{"redirect": …}` to send the client
//! to `/?<flag>`. Probe or refresh failures never surface here as errors.

use super::forwarded_cookie;
use crate::gate::{Gate, Route};
use axum::{extract::Extension, http::HeaderMap, response::Json};
use serde_json::Value;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page props; never gated")
    ),
    tag = "pages"
)]
pub async fn home(headers: HeaderMap, gate: Extension<Arc<Gate>>) -> Json<Value> {
    page(Route::Home, &headers, &gate).await
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page props, or a redirect document when already logged in")
    ),
    tag = "pages"
)]
pub async fn login(headers: HeaderMap, gate: Extension<Arc<Gate>>) -> Json<Value> {
    page(Route::Login, &headers, &gate).await
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "User administration props, or a redirect document for non-admins")
    ),
    tag = "pages"
)]
pub async fn users(headers: HeaderMap, gate: Extension<Arc<Gate>>) -> Json<Value> {
    page(Route::Users, &headers, &gate).await
}

#[utoipa::path(
    get,
    path = "/verify",
    responses(
        (status = 200, description = "Verification page props, or a redirect document when already verified")
    ),
    tag = "pages"
)]
pub async fn verify(headers: HeaderMap, gate: Extension<Arc<Gate>>) -> Json<Value> {
    page(Route::Verify, &headers, &gate).await
}

async fn page(route: Route, headers: &HeaderMap, gate: &Gate) -> Json<Value> {
    let cookie = forwarded_cookie(headers);
    let outcome = gate.evaluate(route, cookie.as_ref()).await;
    Json(outcome.to_document())
}
