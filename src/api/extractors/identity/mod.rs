/*!
 * Identity extractor
 *
 * Responsibility:
 * - Hand the request's authenticated identity (if any) to handlers
 * - axum wiring lives in core, the type itself in types
 *
 * Public API:
 * - Identity
 * - CurrentIdentity
 */

mod core;
mod types;

pub use core::CurrentIdentity;
pub use types::Identity;
