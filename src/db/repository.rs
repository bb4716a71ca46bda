//! Repository pattern implementation for data access layer
//!
//! Each repository wraps the shared [`DatabaseManager`]. Alongside the
//! pooled-connection methods, repositories expose `*_tx` associated functions
//! that take a plain `&Connection`, so multi-step workflows can run them
//! inside a single transaction.
//!
//! "Insertion order" throughout this module is SQLite `rowid` order.

use crate::core::error::{is_unique_violation, CatalogError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Author, Book, BookAuthor, Review, User};
use rusqlite::{Connection, OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for CRUD operations
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities in insertion order
    fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    fn create(&self, entity: &T) -> Result<()>;

    /// Delete an entity by its ID
    fn delete(&self, id: &str) -> Result<()>;
}

fn collect_rows<T>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// BOOKS
// ============================================================================

const BOOK_COLUMNS: &str = "id, title, pages, year, created_at";

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        pages: row.get(2)?,
        year: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Repository for Book entities
pub struct BookRepository {
    db: Arc<DatabaseManager>,
}

impl BookRepository {
    /// Create a new BookRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Authors of a book, in association order
    pub fn find_authors(&self, book_id: &str) -> Result<Vec<Author>> {
        self.db.execute(|conn| Self::find_authors_tx(conn, book_id))
    }

    pub fn find_by_id_tx(conn: &Connection, id: &str) -> Result<Option<Book>> {
        let book = conn
            .query_row(
                &format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS),
                [id],
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    pub fn find_by_title_tx(conn: &Connection, title: &str) -> Result<Option<Book>> {
        let book = conn
            .query_row(
                &format!("SELECT {} FROM books WHERE title = ?", BOOK_COLUMNS),
                [title],
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    pub fn find_all_tx(conn: &Connection) -> Result<Vec<Book>> {
        collect_rows(
            conn,
            &format!("SELECT {} FROM books ORDER BY rowid", BOOK_COLUMNS),
            [],
            book_from_row,
        )
    }

    /// Insert a book; a title collision is reported as `DuplicateTitle`
    pub fn insert_tx(conn: &Connection, book: &Book) -> Result<()> {
        conn.execute(
            "INSERT INTO books (id, title, pages, year, created_at) VALUES (?, ?, ?, ?, ?)",
            rusqlite::params![&book.id, &book.title, book.pages, book.year, &book.created_at],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateTitle(format!(
                    "A book titled {:?} already exists",
                    book.title
                ))
            } else {
                CatalogError::DatabaseError(e)
            }
        })?;
        Ok(())
    }

    /// Delete a book row, returning the number of rows removed
    pub fn delete_tx(conn: &Connection, id: &str) -> Result<usize> {
        Ok(conn.execute("DELETE FROM books WHERE id = ?", [id])?)
    }

    pub fn find_authors_tx(conn: &Connection, book_id: &str) -> Result<Vec<Author>> {
        collect_rows(
            conn,
            "SELECT a.id, a.name, a.created_at FROM authors a \
             JOIN book_authors ba ON ba.author_id = a.id \
             WHERE ba.book_id = ? ORDER BY ba.position, ba.rowid",
            [book_id],
            author_from_row,
        )
    }
}

impl Repository<Book> for BookRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        self.db.execute(|conn| Self::find_by_id_tx(conn, id))
    }

    fn find_all(&self) -> Result<Vec<Book>> {
        self.db.execute(Self::find_all_tx)
    }

    fn create(&self, book: &Book) -> Result<()> {
        self.db.execute(|conn| Self::insert_tx(conn, book))
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.db.execute(|conn| Self::delete_tx(conn, id).map(|_| ()))
    }
}

// ============================================================================
// AUTHORS
// ============================================================================

fn author_from_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Repository for Author entities and their book links
pub struct AuthorRepository {
    db: Arc<DatabaseManager>,
}

impl AuthorRepository {
    /// Create a new AuthorRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find the earliest author whose name matches exactly
    pub fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        self.db.execute(|conn| Self::find_by_name_tx(conn, name))
    }

    /// Books linked to an author, in insertion order
    pub fn find_books_for_author(&self, author_id: &str) -> Result<Vec<Book>> {
        self.db.execute(|conn| {
            collect_rows(
                conn,
                "SELECT b.id, b.title, b.pages, b.year, b.created_at FROM books b \
                 JOIN book_authors ba ON ba.book_id = b.id \
                 WHERE ba.author_id = ? ORDER BY b.rowid",
                [author_id],
                book_from_row,
            )
        })
    }

    pub fn find_by_id_tx(conn: &Connection, id: &str) -> Result<Option<Author>> {
        let author = conn
            .query_row(
                "SELECT id, name, created_at FROM authors WHERE id = ?",
                [id],
                author_from_row,
            )
            .optional()?;
        Ok(author)
    }

    pub fn find_by_name_tx(conn: &Connection, name: &str) -> Result<Option<Author>> {
        let author = conn
            .query_row(
                "SELECT id, name, created_at FROM authors WHERE name = ? ORDER BY rowid LIMIT 1",
                [name],
                author_from_row,
            )
            .optional()?;
        Ok(author)
    }

    pub fn insert_tx(conn: &Connection, author: &Author) -> Result<()> {
        conn.execute(
            "INSERT INTO authors (id, name, created_at) VALUES (?, ?, ?)",
            rusqlite::params![&author.id, &author.name, &author.created_at],
        )?;
        Ok(())
    }

    pub fn delete_tx(conn: &Connection, id: &str) -> Result<usize> {
        Ok(conn.execute("DELETE FROM authors WHERE id = ?", [id])?)
    }

    pub fn link_tx(conn: &Connection, link: &BookAuthor) -> Result<()> {
        conn.execute(
            "INSERT INTO book_authors (book_id, author_id, position) VALUES (?, ?, ?)",
            rusqlite::params![&link.book_id, &link.author_id, link.position],
        )?;
        Ok(())
    }

    pub fn unlink_tx(conn: &Connection, book_id: &str, author_id: &str) -> Result<usize> {
        Ok(conn.execute(
            "DELETE FROM book_authors WHERE book_id = ? AND author_id = ?",
            [book_id, author_id],
        )?)
    }

    /// IDs of the authors linked to a book, in association order
    pub fn author_ids_for_book_tx(conn: &Connection, book_id: &str) -> Result<Vec<String>> {
        collect_rows(
            conn,
            "SELECT author_id FROM book_authors WHERE book_id = ? ORDER BY position, rowid",
            [book_id],
            |row| row.get(0),
        )
    }

    pub fn count_links_tx(conn: &Connection, author_id: &str) -> Result<i64> {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM book_authors WHERE author_id = ?",
            [author_id],
            |row| row.get(0),
        )?)
    }
}

impl Repository<Author> for AuthorRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Author>> {
        self.db.execute(|conn| Self::find_by_id_tx(conn, id))
    }

    fn find_all(&self) -> Result<Vec<Author>> {
        self.db.execute(|conn| {
            collect_rows(
                conn,
                "SELECT id, name, created_at FROM authors ORDER BY rowid",
                [],
                author_from_row,
            )
        })
    }

    fn create(&self, author: &Author) -> Result<()> {
        self.db.execute(|conn| Self::insert_tx(conn, author))
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.db.execute(|conn| Self::delete_tx(conn, id).map(|_| ()))
    }
}

// ============================================================================
// REVIEWS
// ============================================================================

const REVIEW_COLUMNS: &str = "id, title, description, score, book_id, user_id, created_at";

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        score: row.get(3)?,
        book_id: row.get(4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Repository for Review entities
pub struct ReviewRepository {
    db: Arc<DatabaseManager>,
}

impl ReviewRepository {
    /// Create a new ReviewRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Reviews of one book, in insertion order
    pub fn find_by_book(&self, book_id: &str) -> Result<Vec<Review>> {
        self.db.execute(|conn| Self::find_by_book_tx(conn, book_id))
    }

    pub fn find_by_book_tx(conn: &Connection, book_id: &str) -> Result<Vec<Review>> {
        collect_rows(
            conn,
            &format!("SELECT {} FROM reviews WHERE book_id = ? ORDER BY rowid", REVIEW_COLUMNS),
            [book_id],
            review_from_row,
        )
    }

    /// Reviews written by one user, in insertion order
    pub fn find_by_user_tx(conn: &Connection, user_id: &str) -> Result<Vec<Review>> {
        collect_rows(
            conn,
            &format!("SELECT {} FROM reviews WHERE user_id = ? ORDER BY rowid", REVIEW_COLUMNS),
            [user_id],
            review_from_row,
        )
    }

    pub fn find_all_tx(conn: &Connection) -> Result<Vec<Review>> {
        collect_rows(
            conn,
            &format!("SELECT {} FROM reviews ORDER BY rowid", REVIEW_COLUMNS),
            [],
            review_from_row,
        )
    }

    pub fn insert_tx(conn: &Connection, review: &Review) -> Result<()> {
        conn.execute(
            "INSERT INTO reviews (id, title, description, score, book_id, user_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                &review.id,
                &review.title,
                &review.description,
                review.score,
                &review.book_id,
                &review.user_id,
                &review.created_at,
            ],
        )?;
        Ok(())
    }

    /// Delete every review of a book, returning how many were removed
    pub fn delete_by_book_tx(conn: &Connection, book_id: &str) -> Result<usize> {
        Ok(conn.execute("DELETE FROM reviews WHERE book_id = ?", [book_id])?)
    }
}

impl Repository<Review> for ReviewRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Review>> {
        self.db.execute(|conn| {
            let review = conn
                .query_row(
                    &format!("SELECT {} FROM reviews WHERE id = ?", REVIEW_COLUMNS),
                    [id],
                    review_from_row,
                )
                .optional()?;
            Ok(review)
        })
    }

    fn find_all(&self) -> Result<Vec<Review>> {
        self.db.execute(Self::find_all_tx)
    }

    fn create(&self, review: &Review) -> Result<()> {
        self.db.execute(|conn| Self::insert_tx(conn, review))
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.db.execute(|conn| {
            conn.execute("DELETE FROM reviews WHERE id = ?", [id])?;
            Ok(())
        })
    }
}

// ============================================================================
// USERS
// ============================================================================

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn find_by_id_tx(conn: &Connection, id: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE id = ?",
                [id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl Repository<User> for UserRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.db.execute(|conn| Self::find_by_id_tx(conn, id))
    }

    fn find_all(&self) -> Result<Vec<User>> {
        self.db.execute(|conn| {
            collect_rows(
                conn,
                "SELECT id, name, created_at FROM users ORDER BY rowid",
                [],
                user_from_row,
            )
        })
    }

    fn create(&self, user: &User) -> Result<()> {
        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, created_at) VALUES (?, ?, ?)",
                rusqlite::params![&user.id, &user.name, &user.created_at],
            )?;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.db.execute(|conn| {
            conn.execute("DELETE FROM users WHERE id = ?", [id])?;
            Ok(())
        })
    }
}
