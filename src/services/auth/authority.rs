//! Role claim → granted authority mapping.

/// Marker prepended to every role-derived authority.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Authority granted when the token carries no usable role.
pub const DEFAULT_AUTHORITY: &str = "ROLE_USER";

/// Map the free-form `role` claim to an authority string.
///
/// Absent, empty and whitespace-only roles all fall back to [`DEFAULT_AUTHORITY`].
/// Any other value is uppercased as-is.
pub fn authority_for_role(role: Option<&str>) -> String {
    match role.filter(|r| !r.trim().is_empty()) {
        Some(role) => format!("{ROLE_PREFIX}{}", role.to_uppercase()),
        None => DEFAULT_AUTHORITY.to_string(),
    }
}
