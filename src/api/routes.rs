/*
 * Responsibility
 * - URL layout under /api
 * - Authentication is applied to the whole tree by the bearer middleware;
 *   each handler decides whether it needs an identity
 */
use axum::{Router, routing::get};

use crate::api::handlers::{health::health, me::me};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
}
