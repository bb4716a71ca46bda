//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// Book record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub pages: i32,
    pub year: i32,
    pub created_at: String,
}

/// Author record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Join record linking a book to one of its authors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAuthor {
    pub book_id: String,
    pub author_id: String,
    /// Association order within the book, starting at 0
    pub position: i32,
}

/// Review record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: i32,
    pub book_id: String,
    pub user_id: String,
    pub created_at: String,
}

/// User record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: String,
}
