//! Book Catalog - command-line front end
//!
//! Every command prints a JSON document on stdout. Failures print an error
//! envelope instead and exit with a non-zero status.

use book_catalog::core::{
    CatalogError, CatalogService, CliArgs, Command, Config, CreateBookParams, ErrorResponse,
    Logger, NewReview, Ranking, Result, SortToken,
};
use book_catalog::db::DatabaseManager;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Load configuration (CLI args, env vars and config file)
    let config = match Config::load(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging isn't initialized yet
            print_error(&CatalogError::ConfigError(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let _logger = match Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            print_error(&CatalogError::InitializationError(format!(
                "Failed to initialize logging: {}",
                e
            )));
            return ExitCode::FAILURE;
        }
    };

    info!(version = book_catalog::VERSION, "Book catalog starting");

    match run(&config, args.command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                error = %e,
                kind = e.error_type(),
                retryable = e.is_retryable(),
                "Command failed"
            );
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: Command) -> Result<String> {
    let db = Arc::new(DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!(path = ?db.db_path(), pool_size = db.pool_size(), "Database opened");
    let service = CatalogService::new(db.clone());

    let output: Value = match command {
        Command::List { sort } => {
            let token = match sort {
                Some(token) => SortToken::from_token(&token),
                None => config.catalog.default_sort_token(),
            };
            let projected = service.list_books_with_stats()?;
            to_json(&service.sort_books(projected, token))?
        }
        Command::Rank { ranking } => {
            let projected = service.list_books_with_stats()?;
            to_json(&service.rank_books(projected, Ranking::from_token(&ranking)))?
        }
        Command::AddBook {
            title,
            pages,
            year,
            authors,
        } => to_json(&service.create_book(CreateBookParams {
            title,
            pages,
            year,
            authors,
        })?)?,
        Command::DeleteBook { id } => to_json(&service.delete_book(&id)?)?,
        Command::Reviews {
            book_id,
            bottom,
            limit,
        } => {
            let n = limit.unwrap_or(config.catalog.review_limit);
            let reviews = if bottom {
                service.bottom_reviews(&book_id, n)?
            } else {
                service.top_reviews(&book_id, n)?
            };
            to_json(&reviews)?
        }
        Command::AddUser { name } => to_json(&service.register_user(name)?)?,
        Command::AddReview {
            book,
            user,
            title,
            description,
            score,
        } => to_json(&service.submit_review(NewReview {
            title,
            description,
            score,
            book_id: book,
            user_id: user,
        })?)?,
        Command::Author { id } => to_json(&service.get_author(&id)?)?,
        Command::User { id } => to_json(&service.get_user(&id)?)?,
        Command::Backup { path } => {
            db.backup(&path)?;
            info!(path = ?path, "Database backed up");
            serde_json::json!({ "backup": path.display().to_string() })
        }
    };

    serde_json::to_string_pretty(&output)
        .map_err(|e| CatalogError::SerializationError(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| CatalogError::SerializationError(e.to_string()))
}

fn print_error(err: &CatalogError) {
    let response = ErrorResponse::from_error(err);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(_) => eprintln!("{}", response),
    }
}
