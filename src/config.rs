/*
 * Responsibility
 * - Read settings from the environment (JWT_SECRET, PORT, CORS allowlist, ...)
 * - Validate them up front; anything missing or unparsable aborts startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // base64-encoded HMAC secret shared with the identity provider
    pub jwt_secret: String,
    pub auth_audience: Option<String>,
    pub auth_leeway_seconds: u64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &"[hidden]")
            .field("auth_audience", &self.auth_audience)
            .field("auth_leeway_seconds", &self.auth_leeway_seconds)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Parse settings through an arbitrary lookup (process env, a map in tests, ...).
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8080)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let auth_audience = lookup("AUTH_AUDIENCE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let auth_leeway_seconds = parse_or(&lookup, "AUTH_LEEWAY_SECONDS", 0)?;

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?);
        let request_body_limit_bytes =
            parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            auth_audience,
            auth_leeway_seconds,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

// Absent → default; present but unparsable → error.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let config = Config::from_vars(lookup(&[("JWT_SECRET", "c2VjcmV0")])).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.jwt_secret, "c2VjcmV0");
        assert_eq!(config.auth_audience, None);
        assert_eq!(config.auth_leeway_seconds, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let err = Config::from_vars(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_vars(lookup(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = Config::from_vars(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));

        let err = Config::from_vars(lookup(&[("JWT_SECRET", "x"), ("AUTH_LEEWAY_SECONDS", "-5")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_LEEWAY_SECONDS"));
    }

    #[test]
    fn test_production_settings() {
        let config = Config::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("APP_ENV", "PROD"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", "https://quiz.example.com, ,https://admin.example.com"),
            ("AUTH_AUDIENCE", "authenticated"),
        ]))
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://quiz.example.com", "https://admin.example.com"]
        );
        assert_eq!(config.auth_audience.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::from_vars(lookup(&[("JWT_SECRET", "c2VjcmV0")])).unwrap();
        assert!(!format!("{:?}", config).contains("c2VjcmV0"));
    }
}
