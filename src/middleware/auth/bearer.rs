//! Bearer token → `Identity` in request extensions.
//!
//! This layer authenticates, it never authorizes:
//! - No `Authorization` header, or a scheme other than `Bearer `, means "no credential".
//! - A token that fails verification is logged and the request continues anonymously.
//! - Only handlers (via `CurrentIdentity`) decide whether anonymous access is a 401.
//!
//! The request is always forwarded to the next service exactly once.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::api::extractors::Identity;
use crate::services::auth::{TokenError, TokenVerifier};
use crate::state::AppState;

/// Case-sensitive scheme prefix, single space included.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Which branch the interceptor took for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Header absent, not UTF-8, or not a bearer scheme.
    NoCredential,
    /// Token verified and an `Identity` was installed.
    Authenticated,
    /// Token verified but an `Identity` was already present; left untouched.
    AlreadyAuthenticated,
    /// Token verified but its subject is empty; nothing installed.
    EmptySubject,
    /// Token failed verification; nothing installed.
    Rejected(TokenError),
}

/// Apply bearer authentication to every route of `router`.
///
/// ```ignore
/// let api = api::routes();
/// let api = middleware::auth::bearer::apply(api, state.clone());
/// app = app.nest("/api", api);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, bearer_middleware))
}

async fn bearer_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state.verifier, &mut req) {
        AuthOutcome::Authenticated => {
            if let Some(identity) = req.extensions().get::<Identity>() {
                debug!(
                    user_id = %identity.principal(),
                    email = identity.credentials().unwrap_or_default(),
                    expires_at = ?identity.expires_at(),
                    "authenticated bearer token"
                );
            }
        }
        AuthOutcome::AlreadyAuthenticated => {
            debug!("identity already established upstream, keeping it");
        }
        AuthOutcome::EmptySubject => {
            warn!("bearer token verified but subject is empty");
        }
        AuthOutcome::Rejected(err) => {
            warn!(error = %err, "bearer token verification failed");
        }
        AuthOutcome::NoCredential => {}
    }

    next.run(req).await
}

/// Run the per-request authentication state machine against `req`.
///
/// Installs an `Identity` into `req.extensions_mut()` only on
/// [`AuthOutcome::Authenticated`]. Never fails.
pub fn authenticate<B>(verifier: &TokenVerifier, req: &mut Request<B>) -> AuthOutcome {
    let claims = match bearer_token(req.headers()) {
        None => return AuthOutcome::NoCredential,
        Some(token) => match verifier.verify(token) {
            Ok(claims) => claims,
            Err(err) => return AuthOutcome::Rejected(err),
        },
    };

    if req.extensions().get::<Identity>().is_some() {
        return AuthOutcome::AlreadyAuthenticated;
    }

    match Identity::from_claims(&claims) {
        Some(identity) => {
            req.extensions_mut().insert(identity);
            AuthOutcome::Authenticated
        }
        None => AuthOutcome::EmptySubject,
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}
