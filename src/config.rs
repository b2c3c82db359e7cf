use std::str::FromStr;
use std::time::Duration;

use crate::auth::PasswordPolicy;
use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:school_database.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
    /// Off by default: schedules and grades may point at rows that do not exist.
    pub enforce_foreign_keys: bool,
    pub password_policy: PasswordPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            enforce_foreign_keys: false,
            password_policy: PasswordPolicy::Plaintext,
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    /// Reads the store settings from the process environment, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = dotenvy::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let max_connections = match dotenvy::var("SCHOOL_MAX_CONNECTIONS") {
            Ok(value) => {
                let parsed = parse_number::<u32>("SCHOOL_MAX_CONNECTIONS", &value)?;
                if parsed == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "SCHOOL_MAX_CONNECTIONS",
                        value,
                        reason: "must be at least 1".to_string(),
                    });
                }
                parsed
            }
            Err(_) => defaults.max_connections,
        };

        let busy_timeout = match dotenvy::var("SCHOOL_BUSY_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(parse_number("SCHOOL_BUSY_TIMEOUT_SECS", &value)?),
            Err(_) => defaults.busy_timeout,
        };

        let enforce_foreign_keys = match dotenvy::var("SCHOOL_ENFORCE_FOREIGN_KEYS") {
            Ok(value) => parse_flag("SCHOOL_ENFORCE_FOREIGN_KEYS", &value)?,
            Err(_) => defaults.enforce_foreign_keys,
        };

        let password_policy = match dotenvy::var("SCHOOL_HASH_PASSWORDS") {
            Ok(value) => {
                if parse_flag("SCHOOL_HASH_PASSWORDS", &value)? {
                    PasswordPolicy::Bcrypt
                } else {
                    PasswordPolicy::Plaintext
                }
            }
            Err(_) => defaults.password_policy,
        };

        Ok(Self {
            database_url,
            max_connections,
            busy_timeout,
            enforce_foreign_keys,
            password_policy,
        })
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
