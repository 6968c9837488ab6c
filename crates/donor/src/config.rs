//! Donor service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDNANCE_SURVEY_API_KEY` - OS Places API key (high entropy, not a placeholder)
//!
//! ## Optional
//! - `DONOR_HOST` - Bind address (default: 127.0.0.1)
//! - `DONOR_PORT` - Listen port (default: 5050)
//! - `DONOR_DATABASE_URL` - `PostgreSQL` connection string; falls back to
//!   `DATABASE_URL`, and to an in-memory store when neither is set
//! - `ORDNANCE_SURVEY_BASE_URL` - OS API base URL (default: <https://api.os.uk>)
//! - `WITNESS_CODE_WINDOW_SECS` - Witness code attempt window (default: 60)
//! - `WITNESS_CODE_MAX_PER_WINDOW` - Attempts allowed per window (default: 5)
//! - `WITNESS_CODE_MAX_TOTAL` - Attempts allowed in total (default: 10)
//! - `POSTCODE_FORMAT_CHECK` - Check UK postcode format on manual entry (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;
use make_lpa_core::{Limiter, PostcodeRule};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Donor service configuration.
#[derive(Debug, Clone)]
pub struct DonorConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// OS Places API configuration
    pub ordnance_survey: OrdnanceSurveyConfig,
    /// Witness code attempt limits
    pub witness_code: WitnessCodeConfig,
    /// Whether manually entered UK postcodes are format checked
    pub postcode_format_check: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// OS Places API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OrdnanceSurveyConfig {
    /// API base URL (e.g., <https://api.os.uk>)
    pub base_url: Url,
    /// API key sent as the `key` query parameter
    pub api_key: SecretString,
}

impl std::fmt::Debug for OrdnanceSurveyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdnanceSurveyConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Limits on witness code attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessCodeConfig {
    pub window_secs: u32,
    pub max_per_window: u32,
    pub max_total: u32,
}

impl Default for WitnessCodeConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_per_window: 5,
            max_total: 10,
        }
    }
}

impl WitnessCodeConfig {
    /// A fresh limiter with these limits.
    #[must_use]
    pub fn limiter(&self) -> Limiter {
        Limiter::new(
            Duration::seconds(i64::from(self.window_secs)),
            self.max_per_window,
            self.max_total,
        )
    }
}

impl DonorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any source of variables.
    ///
    /// # Errors
    ///
    /// See [`DonorConfig::from_env`].
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&vars);

        let database_url = env
            .optional("DONOR_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        let host = env.parse_or("DONOR_HOST", "127.0.0.1")?;
        let port = env.parse_or("DONOR_PORT", "5050")?;

        let ordnance_survey = OrdnanceSurveyConfig {
            base_url: env.parse_or("ORDNANCE_SURVEY_BASE_URL", "https://api.os.uk")?,
            api_key: env.validated_secret("ORDNANCE_SURVEY_API_KEY")?,
        };

        let defaults = WitnessCodeConfig::default();
        let witness_code = WitnessCodeConfig {
            window_secs: env.parse_or(
                "WITNESS_CODE_WINDOW_SECS",
                &defaults.window_secs.to_string(),
            )?,
            max_per_window: env.parse_or(
                "WITNESS_CODE_MAX_PER_WINDOW",
                &defaults.max_per_window.to_string(),
            )?,
            max_total: env.parse_or("WITNESS_CODE_MAX_TOTAL", &defaults.max_total.to_string())?,
        };

        Ok(Self {
            database_url,
            host,
            port,
            ordnance_survey,
            witness_code,
            postcode_format_check: env.parse_or("POSTCODE_FORMAT_CHECK", "true")?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The rule manually entered postcodes are checked against.
    #[must_use]
    pub fn postcode_rule(&self) -> PostcodeRule {
        if self.postcode_format_check {
            PostcodeRule::default()
        } else {
            PostcodeRule::lenient()
        }
    }

    /// The database URL, if a database is configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_ref().map(|url| url.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable, treating an empty value as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, using `default` when it is unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .as_deref()
            .unwrap_or(default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the OS Data Hub."
            ),
        ));
    }

    Ok(())
}
