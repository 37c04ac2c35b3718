/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 chars)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Token lifetime (default: 30)
/// - `MIN_PASSWORD_LENGTH`: Minimum password length (default: 6)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskflow_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use taskflow_shared::auth::jwt::DEFAULT_EXPIRE_MINUTES;
use taskflow_shared::auth::password::{PasswordPolicy, DEFAULT_MIN_PASSWORD_LENGTH};
use taskflow_shared::db::pool::{is_in_memory_url, DatabaseConfig as PoolConfig};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Password policy
    pub password: PasswordConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://taskflow.db`
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Access token lifetime in minutes
    pub expire_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Minimum password length, in characters
    pub min_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_host = var_or("API_HOST", "0.0.0.0");
        let api_port = var_or("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expire_minutes = var_or("ACCESS_TOKEN_EXPIRE_MINUTES", &DEFAULT_EXPIRE_MINUTES.to_string())
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES is invalid: {}", e))?;

        if expire_minutes <= 0 {
            anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let min_password_length = var_or("MIN_PASSWORD_LENGTH", &DEFAULT_MIN_PASSWORD_LENGTH.to_string())
            .parse::<usize>()
            .map_err(|e| anyhow::anyhow!("MIN_PASSWORD_LENGTH is invalid: {}", e))?;

        let log_format = var_or("LOG_FORMAT", "pretty").parse::<LogFormat>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expire_minutes,
            },
            password: PasswordConfig {
                min_length: min_password_length,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for [`taskflow_shared::db::pool::create_pool`]
    ///
    /// In-memory URLs always get the single-connection settings, whatever
    /// `DATABASE_MAX_CONNECTIONS` says.
    pub fn pool_config(&self) -> PoolConfig {
        if is_in_memory_url(&self.database.url) {
            return PoolConfig {
                url: self.database.url.clone(),
                ..PoolConfig::in_memory()
            };
        }

        PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..PoolConfig::default()
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.password.min_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite://taskflow.db"), ("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expire_minutes, 30);
        assert_eq!(config.password.min_length, 6);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite://taskflow.db"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("CORS_ORIGINS", "http://a.example, http://b.example"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("MIN_PASSWORD_LENGTH", "12"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(
            config.api.cors_origins,
            vec!["http://a.example", "http://b.example"]
        );
        assert_eq!(config.jwt.expire_minutes, 5);
        assert_eq!(config.password_policy().min_length, 12);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_required_variables() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "sqlite://taskflow.db")]).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = load(&[("DATABASE_URL", "sqlite://taskflow.db"), ("JWT_SECRET", "short")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = [("DATABASE_URL", "sqlite://taskflow.db"), ("JWT_SECRET", SECRET)];

        for bad in [
            ("API_PORT", "http"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "0"),
            ("MIN_PASSWORD_LENGTH", "-1"),
            ("LOG_FORMAT", "xml"),
        ] {
            let mut vars = base.to_vec();
            vars.push(bad);
            assert!(load(&vars).is_err(), "{} = {} should be rejected", bad.0, bad.1);
        }
    }

    #[test]
    fn test_pool_config() {
        let config = load(&[
            ("DATABASE_URL", "sqlite://taskflow.db"),
            ("JWT_SECRET", SECRET),
            ("DATABASE_MAX_CONNECTIONS", "3"),
        ])
        .unwrap();

        let pool = config.pool_config();
        assert_eq!(pool.url, "sqlite://taskflow.db");
        assert_eq!(pool.max_connections, 3);
    }

    #[test]
    fn test_in_memory_pool_config_is_single_connection() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", SECRET),
            ("DATABASE_MAX_CONNECTIONS", "10"),
        ])
        .unwrap();

        let pool = config.pool_config();
        assert_eq!(pool.url, "sqlite::memory:");
        assert_eq!(pool.max_connections, 1);
        assert!(pool.idle_timeout_seconds.is_none());
        assert!(pool.max_lifetime_seconds.is_none());
    }
}
