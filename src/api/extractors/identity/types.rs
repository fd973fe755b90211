/*
 * Responsibility
 * - The authenticated-principal type handlers see
 * - Built by the bearer middleware from verified claims and stored in request extensions
 *
 * Notes
 * - Lives and dies with a single request; nothing here is shared across requests
 * - Authorization decisions on `authorities` belong to route handlers
 */
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::services::auth::{Claims, authority_for_role};

/// Identity established for one request by a successfully verified bearer token.
///
/// - `principal()` is the token subject
/// - `credentials()` is the email claim, if any
/// - `authorities()` holds the role-derived authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject_id: String,
    email: Option<String>,
    authorities: BTreeSet<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(
        subject_id: impl Into<String>,
        email: Option<String>,
        role: Option<&str>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            email,
            authorities: BTreeSet::from([authority_for_role(role)]),
            expires_at: None,
        }
    }

    /// Returns `None` when the subject is empty; such a token identifies nobody.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        if claims.sub.is_empty() {
            return None;
        }

        let mut identity = Self::new(
            claims.sub.clone(),
            claims.email.clone(),
            claims.role.as_deref(),
        );
        identity.expires_at = Some(claims.exp)
            .filter(|exp| exp.is_finite())
            .and_then(|exp| DateTime::from_timestamp(exp.trunc() as i64, 0));
        Some(identity)
    }

    pub fn principal(&self) -> &str {
        &self.subject_id
    }

    pub fn credentials(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}
