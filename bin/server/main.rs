//! Snake Showdown Server
//!
//! Serves the game backend over HTTP, backed by PostgreSQL when a database
//! URL is configured and by process memory otherwise.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use snake_showdown::storage::pg::PgConfig;
use snake_showdown::{router, seed, AppState, GameStore, MemoryStore, PgStore, ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "snake-server")]
#[command(about = "Snake Showdown HTTP Server")]
struct Args {
    /// Server port
    #[arg(short, long, env = "SNAKE_PORT")]
    port: Option<u16>,

    /// Server host
    #[arg(long, env = "SNAKE_HOST")]
    host: Option<String>,

    /// PostgreSQL URL; the in-memory store is used when unset
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Token signing secret
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Token lifetime in days
    #[arg(long, env = "TOKEN_TTL_DAYS")]
    token_ttl_days: Option<i64>,

    /// Optional TOML config file
    #[arg(short, long, env = "SNAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Load demo users, scores and live sessions on startup
    #[arg(long, env = "SNAKE_SEED")]
    seed: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.database_url.is_some() {
            config.database_url = self.database_url;
        }
        if let Some(secret) = self.secret_key {
            config.secret_key = secret;
        }
        if let Some(days) = self.token_ttl_days {
            config.token_ttl_days = days;
        }
        config.seed |= self.seed;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("snake_showdown=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let config = Args::parse().into_config()?;

    info!("Starting Snake Showdown Server");
    info!("  Config: {:?}", config);
    if config.uses_dev_secret() {
        warn!("SECRET_KEY not set, using the development signing key");
    }

    let store: Arc<dyn GameStore> = match &config.database_url {
        Some(url) => {
            let pg = PgConfig {
                url: url.clone(),
                pool_size: config.pool_size,
            };
            Arc::new(PgStore::connect(&pg).await?)
        }
        None => {
            warn!("DATABASE_URL not set, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, store)?);

    if state.config.seed {
        seed::seed_demo_data(&state).await?;
    }

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on: {}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
