/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to Clone; the verifier sits behind an Arc and is never mutated
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}
