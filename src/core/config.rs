//! Configuration management

use clap::{Parser, Subcommand};
use config::builder::DefaultState;
use config::{
    Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError as BuilderError, Environment,
    File,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::sorting::SortToken;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid catalog configuration: {0}")]
    InvalidCatalog(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > env vars > config file > defaults
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        // 1. Start with defaults (lowest priority)
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        // 2. Load from config file if specified (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // 3. Override with environment variables (higher priority)
        // Example: CATALOG_DATABASE__PATH=/var/lib/catalog.db
        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Override with CLI arguments (highest priority)
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path, on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration, without consulting files or the environment
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: Config = with_defaults(ConfigBuilder::builder())?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.logging.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("database.path", "./data/catalog.db")?
        .set_default("database.connection_pool_size", 4)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.max_file_size", 10485760)? // 10 MB
        .set_default("logging.max_backups", 5)?
        .set_default("catalog.review_limit", 3)?
        .set_default("catalog.default_sort", "a_title")?)
}

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "book-catalog")]
#[command(about = "Book catalog with review analytics", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(short, long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List books with review statistics
    List {
        /// Sort token (a_title, z_title, low_rating, high_rating, low_count, high_count,
        /// low_pages, high_pages)
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Rank all books by average score (top or worst)
    Rank {
        #[arg(default_value = "top")]
        ranking: String,
    },
    /// Create a book, linking comma-separated authors
    AddBook {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        pages: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        authors: Option<String>,
    },
    /// Delete a book, its reviews and any authors left without books
    DeleteBook { id: String },
    /// Show the best (or worst) reviews of a book
    Reviews {
        book_id: String,
        #[arg(long)]
        bottom: bool,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Register a user
    AddUser {
        #[arg(long)]
        name: Option<String>,
    },
    /// Submit a review for a book
    AddReview {
        #[arg(long)]
        book: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        score: Option<i32>,
    },
    /// Show an author and their books
    Author { id: String },
    /// Show a user and the reviews they wrote
    User { id: String },
    /// Copy the database to another file
    Backup { path: PathBuf },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: u32,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase(
                "connection_pool_size must be greater than 0".to_string(),
            ));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
    pub max_file_size: usize, // bytes
    pub max_backups: usize,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "stderr", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidLogging(
                "max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.max_backups == 0 {
            return Err(ConfigError::InvalidLogging(
                "max_backups must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Default number of reviews shown by top/bottom selection
    pub review_limit: usize,
    /// Sort token applied when a listing is requested without one
    pub default_sort: String,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.review_limit == 0 {
            return Err(ConfigError::InvalidCatalog(
                "review_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured default sort; unknown tokens fall back like any other
    pub fn default_sort_token(&self) -> SortToken {
        SortToken::from_token(&self.default_sort)
    }
}
