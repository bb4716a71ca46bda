//! Core business logic module
//!
//! This module provides the core application layer including:
//! - The catalog service for book creation, deletion and listings
//! - Review statistics, listing orders and rankings
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Title and author-list normalization

pub mod config;
pub mod error;
pub mod logging;
pub mod reviews;
pub mod services;
pub mod sorting;
pub mod stats;
pub mod text;

pub use config::{CliArgs, Command, Config};
pub use error::{CatalogError, ErrorContext, ErrorResponse, Result};
pub use logging::Logger;
pub use reviews::{ReviewRanker, DEFAULT_REVIEW_LIMIT};
pub use services::{
    AuthorWithBooks, BookWithAuthors, CatalogService, CreateBookParams, DeletedBook, NewReview,
    UserWithReviews,
};
pub use sorting::{ExceptionalSelector, Ranking, SortDispatcher, SortToken};
pub use stats::{BookWithStats, StatsProjector};
pub use text::{title_case, AuthorListParser};
