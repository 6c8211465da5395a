//! Bankline API Server
//!
//! Serves the Bankline REST API: account management, sign-in and
//! per-account authorization.
//!
//! # Usage
//!
//! ```bash
//! # PostgreSQL-backed, secret from the environment
//! BANK_JWT_SECRET=... bankline-server --database-url postgres://...
//!
//! # Throwaway in-memory directory with the seed account
//! bankline-server --in-memory --seed --jwt-secret ...
//!
//! # Environment overrides
//! BANKLINE__SERVER__PORT=8080 bankline-server
//! ```

mod config;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bankline_api::{create_router, AppState};
use bankline_auth::{AuthService, JWT_SECRET_ENV, PASSWORD_PEPPER_ENV};
use bankline_db::{Account, AccountStore, Database, MemoryAccountStore, NewAccount};

use crate::config::{LoggingConfig, SeedSettings, ServerConfig};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Bankline API Server
#[derive(Parser, Debug)]
#[command(name = "bankline-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "BANKLINE_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "BANKLINE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BANKLINE_PORT")]
    port: Option<u16>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, env = "BANKLINE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "BANKLINE_LOG_FORMAT")]
    log_format: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Token signing secret
    #[arg(long, env = JWT_SECRET_ENV, hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Pepper mixed into every password hash
    #[arg(long, env = PASSWORD_PEPPER_ENV, hide_env_values = true)]
    password_pepper: Option<String>,

    /// Create the seed account at startup
    #[arg(long)]
    seed: bool,

    /// Keep accounts in memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(db_url) = self.database_url {
            config.database.postgres_url = db_url;
        }
        if let Some(jwt_secret) = self.jwt_secret {
            config.auth.jwt_secret = jwt_secret;
        }
        if let Some(pepper) = self.password_pepper {
            config.auth.password_pepper = Some(pepper);
        }
        if self.seed {
            config.seed.enabled = true;
        }
        if self.in_memory {
            config.database.in_memory = true;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Bankline API Server"
    );

    // Validate before touching the database
    let auth_config = server_config.auth.to_auth_config();
    if let Err(errors) = auth_config.validate() {
        anyhow::bail!("Invalid auth configuration: {}", errors.join("; "));
    }

    let store = init_store(&server_config).await?;

    let auth = Arc::new(AuthService::new(store.clone(), auth_config)?);
    tracing::info!("Authentication service initialized");

    if server_config.seed.enabled {
        seed_account(store.as_ref(), &auth, &server_config.seed).await?;
    }

    let state = Arc::new(AppState::new(store, auth));
    let app = create_router(state, server_config.api.to_api_config());

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        host = %server_config.server.host,
        port = server_config.server.port,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
        _ => subscriber
            .with(fmt::layer().pretty().with_target(true))
            .try_init()?,
    }

    Ok(())
}

/// Initialize the account directory
async fn init_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn AccountStore>> {
    if config.database.in_memory {
        tracing::warn!("Using in-memory account directory; accounts are lost on exit");
        return Ok(Arc::new(MemoryAccountStore::new()));
    }

    let db = Database::connect(&config.database.to_db_config()).await?;

    if config.database.run_migrations {
        db.migrate().await?;
    }

    db.account_repo().ping().await?;
    tracing::info!("Database health check passed");

    Ok(Arc::new(db.account_repo()))
}

/// Create the seed account and log its account number
async fn seed_account(
    store: &dyn AccountStore,
    auth: &AuthService,
    seed: &SeedSettings,
) -> anyhow::Result<Account> {
    let encrypted_password = auth.password.hash_password(&seed.password)?;
    let account = store
        .create(NewAccount::new(
            &seed.first_name,
            &seed.last_name,
            encrypted_password,
        ))
        .await?;

    tracing::info!(
        account_id = account.id,
        account_number = account.account_number,
        "Seed account created"
    );

    Ok(account)
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bankline_auth::AuthConfig;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["bankline-server", "--port", "8080", "--seed", "--in-memory"]);
        assert_eq!(args.port, Some(8080));
        assert!(args.seed);
        assert!(args.in_memory);
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "bankline-server",
            "--host",
            "127.0.0.1",
            "--jwt-secret",
            "cli-secret",
            "--log-format",
            "json",
        ]);
        let mut config = ServerConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.jwt_secret, "cli-secret");
        assert_eq!(config.logging.format, "json");
        // Untouched settings keep their defaults
        assert_eq!(config.server.port, 3000);
        assert!(!config.seed.enabled);
    }

    #[test]
    fn test_password_pepper_reaches_auth_config() {
        let args = Args::parse_from(["bankline-server", "--password-pepper", "cli-pepper"]);
        let mut config = ServerConfig::default();
        args.apply(&mut config);

        let auth = config.auth.to_auth_config();
        assert_eq!(auth.password.pepper.as_deref(), Some("cli-pepper"));
    }

    #[test]
    fn test_password_pepper_flag_reads_environment() {
        let command = <Args as clap::CommandFactory>::command();
        let pepper = command
            .get_arguments()
            .find(|arg| arg.get_id() == "password_pepper")
            .unwrap();
        assert_eq!(
            pepper.get_env().and_then(|name| name.to_str()),
            Some(PASSWORD_PEPPER_ENV)
        );
    }

    #[tokio::test]
    async fn test_seed_account_can_sign_in() {
        let store = Arc::new(MemoryAccountStore::new());
        let mut auth_config = AuthConfig::default();
        auth_config.jwt.secret = "seed-test-secret-at-least-32-bytes!".to_string();
        auth_config.password.memory_cost = 4096;
        auth_config.password.time_cost = 1;
        let auth = AuthService::new(store.clone(), auth_config).unwrap();

        let seeded = seed_account(store.as_ref(), &auth, &SeedSettings::default())
            .await
            .unwrap();

        assert_eq!(seeded.first_name, "Seed");
        assert_eq!(seeded.last_name, "User");
        assert_eq!(seeded.balance, 0);

        let stored = store
            .find_by_account_number(seeded.account_number)
            .await
            .unwrap()
            .unwrap();
        assert!(auth
            .password
            .verify_password("seedPw", &stored.encrypted_password)
            .unwrap());
    }
}
