//! Server Configuration
//!
//! Layered configuration: built-in defaults, then `config/default` and
//! `config/local` files, then `BANKLINE__SECTION__KEY` environment variables.
//! CLI flags are applied on top by `main`.

use bankline_api::ApiConfig;
use bankline_auth::{AuthConfig, JwtConfig, PasswordConfig};
use bankline_db::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server binding configuration
    pub server: ServerSettings,
    /// Account directory configuration
    pub database: DatabaseSettings,
    /// Authentication configuration
    pub auth: AuthSettings,
    /// API configuration
    pub api: ApiSettings,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Seed account created at startup
    pub seed: SeedSettings,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

/// Account directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Keep accounts in process memory instead of PostgreSQL
    pub in_memory: bool,
    /// PostgreSQL connection URL
    pub postgres_url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Minimum connections in pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Run migrations on startup
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            in_memory: false,
            postgres_url: db.postgres_url,
            max_connections: db.pg_max_connections,
            min_connections: db.pg_min_connections,
            connect_timeout_secs: db.pg_acquire_timeout_secs,
            run_migrations: true,
        }
    }
}

impl DatabaseSettings {
    pub fn to_db_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            postgres_url: self.postgres_url.clone(),
            pg_max_connections: self.max_connections,
            pg_min_connections: self.min_connections,
            pg_acquire_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// Authentication settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Token signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime_secs: u64,
    /// Optional password pepper
    pub password_pepper: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 24 * 60 * 60,
            password_pepper: None,
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"***")
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AuthSettings {
    pub fn to_auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt: JwtConfig {
                secret: self.jwt_secret.clone(),
                token_lifetime: Duration::from_secs(self.token_lifetime_secs),
            },
            password: PasswordConfig {
                pepper: self.password_pepper.clone(),
                ..PasswordConfig::default()
            },
        }
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_compression: bool,
    pub enable_tracing: bool,
    pub enable_swagger: bool,
    pub max_body_size: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            enable_cors: api.enable_cors,
            cors_origins: api.cors_origins,
            enable_compression: api.enable_compression,
            enable_tracing: api.enable_tracing,
            enable_swagger: api.enable_swagger,
            max_body_size: api.max_body_size,
        }
    }
}

impl ApiSettings {
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            enable_cors: self.enable_cors,
            cors_origins: self.cors_origins.clone(),
            enable_compression: self.enable_compression,
            enable_tracing: self.enable_tracing,
            enable_swagger: self.enable_swagger,
            max_body_size: self.max_body_size,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Seed account settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Create the seed account at startup
    pub enabled: bool,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            first_name: "Seed".to_string(),
            last_name: "User".to_string(),
            password: "seedPw".to_string(),
        }
    }
}

impl std::fmt::Debug for SeedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedSettings")
            .field("enabled", &self.enabled)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"***")
            .finish()
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // An explicitly named file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        // Environment variables with BANKLINE__ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("BANKLINE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let server_config = builder.build()?.try_deserialize()?;

        Ok(server_config)
    }
}
