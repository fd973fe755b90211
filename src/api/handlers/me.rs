/*
 * Responsibility
 * - GET /api/me: profile of the caller, straight from the verified token
 * - Anonymous callers get 401 via the CurrentIdentity extractor
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::CurrentIdentity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
}

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<MeResponse> {
    tracing::debug!(
        user_id = %identity.principal(),
        "user profile requested"
    );

    Json(MeResponse {
        user_id: identity.principal().to_string(),
        email: identity.credentials().unwrap_or_default().to_string(),
    })
}
