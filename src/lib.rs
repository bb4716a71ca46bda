//! Book Catalog Library
//!
//! Books, authors, users and reviews stored in SQLite, with review
//! statistics, sortable listings, rankings and atomic book lifecycle
//! operations.

pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::{CatalogError, CatalogService, Config};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = crate::core::error::Result<T>;
