use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest key accepted at startup (256 bits, the HS256 floor).
pub const MIN_KEY_LEN: usize = 32;

// Shared secrets are issued padded, but some dashboards strip the trailing `=`.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Startup-time failures while turning the configured secret into a key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing secret is not valid base64")]
    InvalidBase64,
    #[error("signing key is {len} bytes, at least {min} required")]
    TooShort { len: usize, min: usize },
}

/// Per-request verification failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("token algorithm not accepted for this key")]
    UnsupportedAlgorithm,
    #[error("token audience mismatch")]
    InvalidAudience,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm
            }
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            // Base64 / JSON / UTF-8 / missing claims all mean the token is not well-formed.
            _ => Self::MalformedToken,
        }
    }
}

/// Decoded payload of a verified token.
///
/// Only `sub` and `exp` are required. Every claim not modelled here is kept
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// NumericDate; may carry a fractional part.
    pub exp: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Knobs layered on top of the signing key.
#[derive(Debug, Clone, Default)]
pub struct VerifierOptions {
    /// When set, the `aud` claim must contain this value.
    pub audience: Option<String>,
    /// Clock-skew tolerance for `exp`, in seconds.
    pub leeway_seconds: u64,
}

/// HMAC bearer-token verifier.
///
/// Immutable after construction, so a single instance is shared across all
/// requests behind an `Arc`.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    key_len: usize,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("key_len", &self.key_len)
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenVerifier {
    /// Build a verifier from a base64-encoded shared secret with default options.
    pub fn new(secret_b64: &str) -> Result<Self, KeyError> {
        Self::with_options(secret_b64, VerifierOptions::default())
    }

    pub fn with_options(secret_b64: &str, options: VerifierOptions) -> Result<Self, KeyError> {
        let key = SECRET_ENGINE
            .decode(secret_b64.trim())
            .map_err(|_| KeyError::InvalidBase64)?;

        if key.len() < MIN_KEY_LEN {
            return Err(KeyError::TooShort {
                len: key.len(),
                min: MIN_KEY_LEN,
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = accepted_algorithms(key.len());
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = options.leeway_seconds;
        match options.audience.as_deref() {
            Some(aud) => validation.set_audience(&[aud]),
            // Identity providers stamp `aud` on every token; ignore it unless configured.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(&key),
            validation,
            key_len: key.len(),
        })
    }

    /// Verify signature and expiry, then decode the claim set.
    ///
    /// Signature is checked before any claim, so an expired token signed with
    /// the wrong key reports `InvalidSignature`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|c| c.sub)
    }

    pub fn extract_email(&self, token: &str) -> Result<Option<String>, TokenError> {
        self.verify(token).map(|c| c.email)
    }

    pub fn extract_role(&self, token: &str) -> Result<Option<String>, TokenError> {
        self.verify(token).map(|c| c.role)
    }
}

// HS384/HS512 need proportionally longer keys; only advertise what the key can back.
fn accepted_algorithms(key_len: usize) -> Vec<Algorithm> {
    [
        (Algorithm::HS256, 32),
        (Algorithm::HS384, 48),
        (Algorithm::HS512, 64),
    ]
    .into_iter()
    .filter(|(_, min)| key_len >= *min)
    .map(|(alg, _)| alg)
    .collect()
}
