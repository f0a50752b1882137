use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub database: DatabaseConfig,
    pub processing: ProcessingConfig,
}

/// Locations of the three source CSV exports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub transactions_csv: PathBuf,
    pub outputs_csv: PathBuf,
    pub inputs_csv: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub default_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub progress_interval: usize,
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("paths.transactions_csv", "./data/transactions.csv")?
            .set_default("paths.outputs_csv", "./data/outputs.csv")?
            .set_default("paths.inputs_csv", "./data/inputs.csv")?
            .set_default("database.default_path", "./balance_pipeline.db")?
            .set_default("processing.batch_size", 10000)?
            .set_default("processing.progress_interval", 100000)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // BCH_PIPELINE_* env variables override file configuration
            .add_source(config::Environment::with_prefix("BCH_PIPELINE"))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Check for specific environment variables with custom names
        if let Ok(path) = env::var("BCH_TRANSACTIONS_CSV") {
            app_config.paths.transactions_csv = PathBuf::from(path);
        }
        if let Ok(path) = env::var("BCH_OUTPUTS_CSV") {
            app_config.paths.outputs_csv = PathBuf::from(path);
        }
        if let Ok(path) = env::var("BCH_INPUTS_CSV") {
            app_config.paths.inputs_csv = PathBuf::from(path);
        }
        if let Ok(db_path) = env::var("BCH_DATABASE_PATH") {
            app_config.database.default_path = PathBuf::from(db_path);
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        // Try to load config for defaults, but don't fail if not found
        match Self::load() {
            Ok(config) => Ok(config),
            Err(_) => Ok(Self {
                paths: PathsConfig {
                    transactions_csv: PathBuf::from("./data/transactions.csv"),
                    outputs_csv: PathBuf::from("./data/outputs.csv"),
                    inputs_csv: PathBuf::from("./data/inputs.csv"),
                },
                database: DatabaseConfig {
                    default_path: PathBuf::from("./balance_pipeline.db"),
                },
                processing: ProcessingConfig {
                    batch_size: 10_000,
                    progress_interval: 100_000,
                },
            }),
        }
    }
}
