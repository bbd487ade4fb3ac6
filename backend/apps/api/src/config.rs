//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0:8080)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `FRONTEND_ORIGINS` - Comma-separated CORS origins
//! - `PASSWORD_PEPPER` - Base64 application-wide password pepper
//! - `CART_MAX_QUANTITY_PER_ADD` - Largest quantity a single add accepts (default: 10000)

use std::net::SocketAddr;

use base64::Engine;
use base64::engine::general_purpose;
use secrecy::{SecretSlice, SecretString};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_MAX_QUANTITY_PER_ADD: i32 = 10_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
#[derive(Debug)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    /// Origins allowed by CORS
    pub frontend_origins: Vec<String>,
    /// Decoded password pepper
    pub password_pepper: Option<SecretSlice<u8>>,
    pub max_quantity_per_add: i32,
}

impl ApiConfig {
    /// Load configuration from the process environment and `.env`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        let database_url = SecretString::from(env.required("DATABASE_URL")?);

        let bind_addr = env.parsed_or("BIND_ADDR", DEFAULT_BIND_ADDR)?;

        let database_max_connections: u32 =
            env.parsed_or("DATABASE_MAX_CONNECTIONS", &DEFAULT_MAX_CONNECTIONS.to_string())?;
        if database_max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DATABASE_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let frontend_origins = env
            .or_default("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let password_pepper = env
            .optional("PASSWORD_PEPPER")
            .map(|encoded| {
                general_purpose::STANDARD
                    .decode(encoded.trim())
                    .map(SecretSlice::from)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("PASSWORD_PEPPER".to_string(), e.to_string())
                    })
            })
            .transpose()?;

        let max_quantity_per_add: i32 = env.parsed_or(
            "CART_MAX_QUANTITY_PER_ADD",
            &DEFAULT_MAX_QUANTITY_PER_ADD.to_string(),
        )?;
        if max_quantity_per_add < 1 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_MAX_QUANTITY_PER_ADD".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            bind_addr,
            database_max_connections,
            frontend_origins,
            password_pepper,
            max_quantity_per_add,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Unset and empty are the same thing
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
