use std::env;
use anyhow::{bail, Context, Result};

/// Which backend the key-value store facade talks to.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Cloud Spanner, the production backend.
    Spanner(SpannerConfig),
    /// In-process map for local development and tests.
    Memory,
}

#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_secret: String,
    pub store: StoreConfig,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_secret = env::var("API_SECRET")
            .context("API_SECRET environment variable is required")?;
        if api_secret.is_empty() {
            bail!("API_SECRET must not be empty");
        }

        let store = match env::var("STORE_BACKEND").as_deref() {
            Err(_) | Ok("spanner") => StoreConfig::Spanner(SpannerConfig::from_env()?),
            Ok("memory") => StoreConfig::Memory,
            Ok(other) => bail!("STORE_BACKEND must be 'spanner' or 'memory', got '{}'", other),
        };

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            api_secret,
            store,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.store {
            StoreConfig::Spanner(spanner) => {
                tracing::info!("  Store backend: spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
            }
            StoreConfig::Memory => {
                tracing::info!("  Store backend: memory (non-durable)");
            }
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
        // The API secret never appears in logs.
    }
}

impl SpannerConfig {
    fn from_env() -> Result<Self> {
        let emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        Ok(SpannerConfig {
            emulator_host,
            project,
            instance,
            database,
        })
    }
}
