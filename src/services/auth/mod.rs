pub mod authority;
pub mod token_verifier;

pub use authority::authority_for_role;
pub use token_verifier::{Claims, KeyError, TokenError, TokenVerifier, VerifierOptions};
