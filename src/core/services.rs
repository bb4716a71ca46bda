//! Business logic services
//!
//! [`CatalogService`] is the application layer between callers (the CLI, or
//! any request layer) and the database. Book creation and deletion each run
//! as a single transaction: either every write lands or none does.

use crate::core::error::{CatalogError, Result};
use crate::core::reviews::ReviewRanker;
use crate::core::sorting::{ExceptionalSelector, Ranking, SortDispatcher, SortToken};
use crate::core::stats::{BookWithStats, StatsProjector};
use crate::core::text::{title_case, AuthorListParser};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Author, Book, BookAuthor, Review, User};
use crate::db::repository::{
    AuthorRepository, BookRepository, Repository, ReviewRepository, UserRepository,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Input for creating a book
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookParams {
    pub title: Option<String>,
    pub pages: Option<i32>,
    pub year: Option<i32>,
    /// Comma-separated author names
    pub authors: Option<String>,
}

/// Input for submitting a review; every field is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub score: Option<i32>,
    pub book_id: Option<String>,
    pub user_id: Option<String>,
}

/// A book with its authors in association order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookWithAuthors {
    #[serde(flatten)]
    pub book: Book,
    pub authors: Vec<Author>,
}

/// What a book deletion removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedBook {
    pub book: Book,
    pub reviews_removed: usize,
    /// Authors deleted because this was their last book
    pub authors_removed: Vec<String>,
}

/// An author and the books they are linked to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

/// A user and the reviews they wrote, in submission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithReviews {
    #[serde(flatten)]
    pub user: User,
    pub reviews: Vec<Review>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::ValidationError(format!("{} can't be blank", field))),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| CatalogError::ValidationError(format!("{} can't be blank", field)))
}

/// Catalog service for books, authors, reviews and users
pub struct CatalogService {
    db: Arc<DatabaseManager>,
    books: BookRepository,
    authors: AuthorRepository,
    reviews: ReviewRepository,
    users: UserRepository,
}

impl CatalogService {
    /// Create a new CatalogService
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self {
            books: BookRepository::new(db.clone()),
            authors: AuthorRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            db,
        }
    }

    /// Create a book and link its authors.
    ///
    /// The title and each author name are title-cased. An author whose
    /// normalized name already exists is reused rather than duplicated; a
    /// name repeated within `authors` is linked once.
    pub fn create_book(&self, params: CreateBookParams) -> Result<BookWithAuthors> {
        let title = title_case(required_text(params.title, "Title")?.trim());
        let pages = required(params.pages, "Pages")?;
        let year = required(params.year, "Year")?;
        let names = AuthorListParser::parse(params.authors.as_deref());

        let now = Utc::now().to_rfc3339();
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title,
            pages,
            year,
            created_at: now.clone(),
        };

        let created = self
            .db
            .transaction(|tx| {
                if BookRepository::find_by_title_tx(tx, &book.title)?.is_some() {
                    return Err(CatalogError::DuplicateTitle(format!(
                        "A book titled {:?} already exists",
                        book.title
                    )));
                }
                BookRepository::insert_tx(tx, &book)?;

                let mut linked: Vec<Author> = Vec::with_capacity(names.len());
                for name in &names {
                    let author = match AuthorRepository::find_by_name_tx(tx, name)? {
                        Some(existing) => {
                            info!(
                                author_id = %existing.id,
                                name = %name,
                                "Reusing existing author"
                            );
                            existing
                        }
                        None => {
                            let author = Author {
                                id: Uuid::new_v4().to_string(),
                                name: name.clone(),
                                created_at: now.clone(),
                            };
                            AuthorRepository::insert_tx(tx, &author)?;
                            info!(author_id = %author.id, name = %name, "Created author");
                            author
                        }
                    };

                    if linked.iter().any(|a| a.id == author.id) {
                        continue;
                    }

                    AuthorRepository::link_tx(
                        tx,
                        &BookAuthor {
                            book_id: book.id.clone(),
                            author_id: author.id.clone(),
                            position: linked.len() as i32,
                        },
                    )?;
                    linked.push(author);
                }

                Ok(BookWithAuthors {
                    book: book.clone(),
                    authors: linked,
                })
            })
            .map_err(|e| e.into_atomicity_failure("create book"))?;

        info!(
            book_id = %created.book.id,
            title = %created.book.title,
            authors = created.authors.len(),
            "Book created"
        );
        Ok(created)
    }

    /// Delete a book, its reviews, and every author left without a book.
    ///
    /// Authors still linked to another book are kept.
    pub fn delete_book(&self, id: &str) -> Result<DeletedBook> {
        let deleted = self
            .db
            .transaction(|tx| {
                let book = BookRepository::find_by_id_tx(tx, id)?.ok_or_else(|| {
                    CatalogError::NotFound(format!("Book with ID {} not found", id))
                })?;

                let reviews_removed = ReviewRepository::delete_by_book_tx(tx, id)?;

                let mut authors_removed = Vec::new();
                for author_id in AuthorRepository::author_ids_for_book_tx(tx, id)? {
                    AuthorRepository::unlink_tx(tx, id, &author_id)?;
                    if AuthorRepository::count_links_tx(tx, &author_id)? == 0 {
                        AuthorRepository::delete_tx(tx, &author_id)?;
                        info!(author_id = %author_id, "Removed orphaned author");
                        authors_removed.push(author_id);
                    }
                }

                BookRepository::delete_tx(tx, id)?;

                Ok(DeletedBook {
                    book,
                    reviews_removed,
                    authors_removed,
                })
            })
            .map_err(|e| e.into_atomicity_failure("delete book"))?;

        info!(
            book_id = %deleted.book.id,
            reviews_removed = deleted.reviews_removed,
            authors_removed = deleted.authors_removed.len(),
            "Book deleted"
        );
        Ok(deleted)
    }

    /// Every book with statistics recomputed from the current reviews,
    /// in insertion order
    pub fn list_books_with_stats(&self) -> Result<Vec<BookWithStats>> {
        let projected = self.db.execute(|conn| {
            let books = BookRepository::find_all_tx(conn)?;
            let reviews = ReviewRepository::find_all_tx(conn)?;
            Ok(StatsProjector::project(books, &reviews))
        })?;
        debug!(books = projected.len(), "Projected book statistics");
        Ok(projected)
    }

    /// Reorder a projection by a listing order
    pub fn sort_books(
        &self,
        projected: Vec<BookWithStats>,
        token: SortToken,
    ) -> Vec<BookWithStats> {
        SortDispatcher::apply(projected, token)
    }

    /// Rank a whole projection by average score
    pub fn rank_books(
        &self,
        projected: Vec<BookWithStats>,
        ranking: Ranking,
    ) -> Vec<BookWithStats> {
        ExceptionalSelector::rank(projected, ranking)
    }

    /// Up to `n` of a book's reviews, best first
    pub fn top_reviews(&self, book_id: &str, n: usize) -> Result<Vec<Review>> {
        Ok(ReviewRanker::top(self.reviews_of(book_id)?, n))
    }

    /// Up to `n` of a book's reviews, worst first
    pub fn bottom_reviews(&self, book_id: &str, n: usize) -> Result<Vec<Review>> {
        Ok(ReviewRanker::bottom(self.reviews_of(book_id)?, n))
    }

    fn reviews_of(&self, book_id: &str) -> Result<Vec<Review>> {
        self.db.execute(|conn| {
            if BookRepository::find_by_id_tx(conn, book_id)?.is_none() {
                return Err(CatalogError::NotFound(format!("Book with ID {} not found", book_id)));
            }
            ReviewRepository::find_by_book_tx(conn, book_id)
        })
    }

    /// A book and its authors
    pub fn get_book(&self, id: &str) -> Result<BookWithAuthors> {
        let book = self
            .books
            .find_by_id(id)?
            .ok_or_else(|| CatalogError::NotFound(format!("Book with ID {} not found", id)))?;
        let authors = self.books.find_authors(&book.id)?;
        Ok(BookWithAuthors { book, authors })
    }

    /// An author and the books they wrote
    pub fn get_author(&self, id: &str) -> Result<AuthorWithBooks> {
        let author = self
            .authors
            .find_by_id(id)?
            .ok_or_else(|| CatalogError::NotFound(format!("Author with ID {} not found", id)))?;
        let books = self.authors.find_books_for_author(&author.id)?;
        Ok(AuthorWithBooks { author, books })
    }

    /// A user and their reviews
    pub fn get_user(&self, id: &str) -> Result<UserWithReviews> {
        self.db.execute(|conn| {
            let user = UserRepository::find_by_id_tx(conn, id)?
                .ok_or_else(|| CatalogError::NotFound(format!("User with ID {} not found", id)))?;
            let reviews = ReviewRepository::find_by_user_tx(conn, &user.id)?;
            Ok(UserWithReviews { user, reviews })
        })
    }

    /// Register a user
    pub fn register_user(&self, name: Option<String>) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: required_text(name, "Name")?,
            created_at: Utc::now().to_rfc3339(),
        };
        self.users.create(&user)?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Submit a review; the book and the user must both exist
    pub fn submit_review(&self, new_review: NewReview) -> Result<Review> {
        let review = Review {
            id: Uuid::new_v4().to_string(),
            title: required_text(new_review.title, "Title")?,
            description: required_text(new_review.description, "Description")?,
            score: required(new_review.score, "Score")?,
            book_id: required_text(new_review.book_id, "Book")?,
            user_id: required_text(new_review.user_id, "User")?,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.transaction(|tx| {
            if BookRepository::find_by_id_tx(tx, &review.book_id)?.is_none() {
                return Err(CatalogError::NotFound(format!(
                    "Book with ID {} not found",
                    review.book_id
                )));
            }
            if UserRepository::find_by_id_tx(tx, &review.user_id)?.is_none() {
                return Err(CatalogError::NotFound(format!(
                    "User with ID {} not found",
                    review.user_id
                )));
            }
            ReviewRepository::insert_tx(tx, &review)
        })?;

        info!(
            review_id = %review.id,
            book_id = %review.book_id,
            score = review.score,
            "Review submitted"
        );
        Ok(review)
    }

    /// Reviews of a book, in submission order
    pub fn reviews_for_book(&self, book_id: &str) -> Result<Vec<Review>> {
        self.reviews.find_by_book(book_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (CatalogService, Arc<DatabaseManager>) {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        (CatalogService::new(db.clone()), db)
    }

    fn params(title: &str, authors: Option<&str>) -> CreateBookParams {
        CreateBookParams {
            title: Some(title.to_string()),
            pages: Some(100),
            year: Some(2000),
            authors: authors.map(str::to_string),
        }
    }

    fn review(service: &CatalogService, book_id: &str, user_id: &str, score: i32) -> Review {
        service
            .submit_review(NewReview {
                title: Some(format!("Review {}", score)),
                description: Some(format!("description {}", score)),
                score: Some(score),
                book_id: Some(book_id.to_string()),
                user_id: Some(user_id.to_string()),
            })
            .unwrap()
    }

    fn count(db: &DatabaseManager, table: &str) -> i64 {
        db.execute(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_create_book_normalizes_title_and_author() {
        let (service, _db) = service();

        let created = service
            .create_book(CreateBookParams {
                title: Some("the test title".to_string()),
                pages: Some(300),
                year: Some(2003),
                authors: Some("single name".to_string()),
            })
            .unwrap();

        assert_eq!(created.book.title, "The Test Title");
        assert_eq!(created.book.pages, 300);
        assert_eq!(created.book.year, 2003);
        assert_eq!(created.authors.len(), 1);
        assert_eq!(created.authors[0].name, "Single Name");

        let stored = service.get_book(&created.book.id).unwrap();
        assert_eq!(stored, created);
    }

    #[test]
    fn test_create_book_links_authors_in_input_order() {
        let (service, _db) = service();

        let created = service
            .create_book(params("ordering", Some("more than,one name")))
            .unwrap();
        let names: Vec<&str> = created.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["More Than", "One Name"]);

        let stored = service.get_book(&created.book.id).unwrap();
        assert_eq!(stored.authors.first().unwrap().name, "More Than");
        assert_eq!(stored.authors.last().unwrap().name, "One Name");
    }

    #[test]
    fn test_create_book_reuses_existing_author() {
        let (service, db) = service();

        let first = service.create_book(params("Title 1", Some("Author 1"))).unwrap();
        let existing_id = first.authors[0].id.clone();

        let second = service
            .create_book(params("Title 2", Some("Author 1,Author 3")))
            .unwrap();

        assert_eq!(second.authors[0].id, existing_id);
        assert_eq!(second.authors[1].name, "Author 3");
        assert_ne!(second.authors[1].id, existing_id);
        assert_eq!(count(&db, "authors"), 2);
    }

    #[test]
    fn test_create_book_reuses_after_normalization() {
        let (service, db) = service();

        service.create_book(params("Title 1", Some("jane doe"))).unwrap();
        let second = service.create_book(params("Title 2", Some("JANE DOE"))).unwrap();

        assert_eq!(second.authors[0].name, "Jane Doe");
        assert_eq!(count(&db, "authors"), 1);
    }

    #[test]
    fn test_create_book_links_repeated_name_once() {
        let (service, db) = service();

        let created = service.create_book(params("Title 1", Some("Zed, Amy, zed"))).unwrap();
        let names: Vec<&str> = created.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
        assert_eq!(count(&db, "book_authors"), 2);
    }

    #[test]
    fn test_create_book_without_authors() {
        let (service, _db) = service();
        let created = service.create_book(params("Lonely", None)).unwrap();
        assert!(created.authors.is_empty());
    }

    #[test]
    fn test_create_book_requires_fields() {
        let (service, db) = service();

        let missing_title = service.create_book(CreateBookParams {
            title: Some("   ".to_string()),
            ..params("x", None)
        });
        assert!(matches!(missing_title, Err(CatalogError::ValidationError(_))));

        let missing_pages = service.create_book(CreateBookParams {
            pages: None,
            ..params("x", None)
        });
        assert!(matches!(missing_pages, Err(CatalogError::ValidationError(_))));

        let missing_year = service.create_book(CreateBookParams {
            year: None,
            ..params("x", None)
        });
        assert!(matches!(missing_year, Err(CatalogError::ValidationError(_))));

        assert_eq!(count(&db, "books"), 0);
    }

    #[test]
    fn test_create_book_rejects_duplicate_title() {
        let (service, db) = service();

        service.create_book(params("dune", Some("Frank Herbert"))).unwrap();
        let dup = service.create_book(params("DUNE", Some("Someone Else")));

        assert!(matches!(dup, Err(CatalogError::DuplicateTitle(_))));
        assert_eq!(count(&db, "books"), 1);
        assert_eq!(count(&db, "authors"), 1);
    }

    #[test]
    fn test_create_book_rolls_back_on_link_failure() {
        let (service, db) = service();
        db.execute(|conn| {
            conn.execute_batch("DROP TABLE book_authors")?;
            Ok(())
        })
        .unwrap();

        let result = service.create_book(params("Title 1", Some("Author 1")));

        assert!(matches!(result, Err(CatalogError::AtomicityFailure(_))));
        assert_eq!(count(&db, "books"), 0);
        assert_eq!(count(&db, "authors"), 0);
    }

    #[test]
    fn test_delete_book_removes_reviews_and_sole_author() {
        let (service, db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();

        let created = service.create_book(params("Title 1", Some("Solo Author"))).unwrap();
        review(&service, &created.book.id, &user.id, 3);
        review(&service, &created.book.id, &user.id, 5);

        let deleted = service.delete_book(&created.book.id).unwrap();

        assert_eq!(deleted.reviews_removed, 2);
        assert_eq!(deleted.authors_removed, vec![created.authors[0].id.clone()]);
        assert_eq!(count(&db, "books"), 0);
        assert_eq!(count(&db, "reviews"), 0);
        assert_eq!(count(&db, "authors"), 0);
        assert_eq!(count(&db, "book_authors"), 0);
        assert_eq!(count(&db, "users"), 1);
    }

    #[test]
    fn test_delete_book_keeps_shared_author() {
        let (service, db) = service();

        let kept = service.create_book(params("Title 1", Some("Shared"))).unwrap();
        let doomed = service.create_book(params("Title 2", Some("Shared, Solo"))).unwrap();
        let shared_id = kept.authors[0].id.clone();

        let deleted = service.delete_book(&doomed.book.id).unwrap();

        assert_eq!(deleted.authors_removed, vec![doomed.authors[1].id.clone()]);
        let remaining = service.get_book(&kept.book.id).unwrap();
        assert_eq!(remaining.authors.len(), 1);
        assert_eq!(remaining.authors[0].id, shared_id);

        let shared = service.get_author(&shared_id).unwrap();
        assert_eq!(shared.books.len(), 1);
        assert_eq!(shared.books[0].id, kept.book.id);
        assert_eq!(count(&db, "authors"), 1);
    }

    #[test]
    fn test_delete_unknown_book() {
        let (service, _db) = service();
        let result = service.delete_book("does-not-exist");
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_delete_book_rolls_back_on_failure() {
        let (service, db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();
        let created = service.create_book(params("Title 1", Some("Author 1"))).unwrap();
        review(&service, &created.book.id, &user.id, 4);

        // Reviews are deleted before the author links are read
        db.execute(|conn| {
            conn.execute_batch("DROP TABLE book_authors")?;
            Ok(())
        })
        .unwrap();

        let result = service.delete_book(&created.book.id);

        assert!(matches!(result, Err(CatalogError::AtomicityFailure(_))));
        assert_eq!(count(&db, "reviews"), 1);
        assert_eq!(count(&db, "books"), 1);
        assert_eq!(count(&db, "authors"), 1);
    }

    #[test]
    fn test_list_books_with_stats() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();

        let rated = service.create_book(params("Title 1", None)).unwrap();
        let unrated = service.create_book(params("Title 2", None)).unwrap();
        review(&service, &rated.book.id, &user.id, 1);
        review(&service, &rated.book.id, &user.id, 2);

        let projected = service.list_books_with_stats().unwrap();

        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].book.id, rated.book.id);
        assert_eq!(projected[0].average_score, Some(1.5));
        assert_eq!(projected[0].review_count, 2);
        assert_eq!(projected[1].book.id, unrated.book.id);
        assert_eq!(projected[1].average_score, None);
        assert_eq!(projected[1].review_count, 0);

        // Recomputed, not cached: identical without writes, updated after one
        assert_eq!(service.list_books_with_stats().unwrap(), projected);
        review(&service, &unrated.book.id, &user.id, 5);
        let updated = service.list_books_with_stats().unwrap();
        assert_eq!(updated[1].average_score, Some(5.0));
    }

    #[test]
    fn test_sort_and_rank_projection() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();

        for (title, score) in [("Title 2", 4), ("Title 1", 2), ("Title 3", 5)] {
            let created = service.create_book(params(title, None)).unwrap();
            review(&service, &created.book.id, &user.id, score);
        }
        let projected = service.list_books_with_stats().unwrap();

        let z = service.sort_books(projected.clone(), SortToken::from_token("z_title"));
        let titles: Vec<&str> = z.iter().map(|b| b.book.title.as_str()).collect();
        assert_eq!(titles, vec!["Title 3", "Title 2", "Title 1"]);

        let top = service.rank_books(z, Ranking::Top);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].book.title, "Title 3");

        let worst = service.rank_books(projected, Ranking::Worst);
        assert_eq!(worst[0].book.title, "Title 1");
    }

    #[test]
    fn test_top_and_bottom_reviews() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();
        let book = service.create_book(params("Title 1", None)).unwrap();

        let low = review(&service, &book.book.id, &user.id, 1);
        let high = review(&service, &book.book.id, &user.id, 2);

        let top = service.top_reviews(&book.book.id, 3).unwrap();
        assert_eq!(top, vec![high.clone(), low.clone()]);

        let bottom = service.bottom_reviews(&book.book.id, 3).unwrap();
        assert_eq!(bottom, vec![low, high]);

        assert!(matches!(
            service.top_reviews("missing", 3),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_submit_review_requires_every_field() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();
        let book = service.create_book(params("Title 1", None)).unwrap();

        let complete = NewReview {
            title: Some("Review 4".to_string()),
            description: Some("description 4".to_string()),
            score: Some(1),
            book_id: Some(book.book.id.clone()),
            user_id: Some(user.id.clone()),
        };

        let cases = [
            NewReview { title: None, ..complete.clone() },
            NewReview { description: Some(String::new()), ..complete.clone() },
            NewReview { score: None, ..complete.clone() },
            NewReview { book_id: None, ..complete.clone() },
            NewReview { user_id: None, ..complete.clone() },
        ];
        for case in cases {
            assert!(matches!(
                service.submit_review(case),
                Err(CatalogError::ValidationError(_))
            ));
        }

        let stored = service.submit_review(complete).unwrap();
        assert_eq!(stored.title, "Review 4");
        assert_eq!(stored.score, 1);
        assert_eq!(service.reviews_for_book(&book.book.id).unwrap(), vec![stored]);
    }

    #[test]
    fn test_submit_review_for_unknown_book_or_user() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();
        let book = service.create_book(params("Title 1", None)).unwrap();

        let unknown_book = service.submit_review(NewReview {
            title: Some("t".into()),
            description: Some("d".into()),
            score: Some(3),
            book_id: Some("missing".into()),
            user_id: Some(user.id.clone()),
        });
        assert!(matches!(unknown_book, Err(CatalogError::NotFound(_))));

        let unknown_user = service.submit_review(NewReview {
            title: Some("t".into()),
            description: Some("d".into()),
            score: Some(3),
            book_id: Some(book.book.id.clone()),
            user_id: Some("missing".into()),
        });
        assert!(matches!(unknown_user, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_get_user_lists_reviews_in_submission_order() {
        let (service, _db) = service();
        let user = service.register_user(Some("One".to_string())).unwrap();
        let other = service.register_user(Some("Two".to_string())).unwrap();
        let first_book = service.create_book(params("Title 1", None)).unwrap();
        let second_book = service.create_book(params("Title 2", None)).unwrap();

        let first = service
            .submit_review(NewReview {
                title: Some("Review 4".to_string()),
                description: Some("description 4".to_string()),
                score: Some(1),
                book_id: Some(second_book.book.id.clone()),
                user_id: Some(user.id.clone()),
            })
            .unwrap();
        review(&service, &first_book.book.id, &other.id, 3);
        let second = review(&service, &first_book.book.id, &user.id, 5);

        let view = service.get_user(&user.id).unwrap();
        assert_eq!(view.user, user);
        assert_eq!(view.reviews, vec![first, second]);
        assert_eq!(view.reviews[0].title, "Review 4");
        assert_eq!(view.reviews[0].description, "description 4");
        assert_eq!(view.reviews[0].score, 1);

        assert_eq!(service.get_user(&other.id).unwrap().reviews.len(), 1);
        assert!(matches!(service.get_user("missing"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_register_user_requires_name() {
        let (service, _db) = service();
        assert!(matches!(
            service.register_user(None),
            Err(CatalogError::ValidationError(_))
        ));
    }

    #[test]
    fn test_get_author_lists_books() {
        let (service, _db) = service();
        let first = service.create_book(params("Title 1", Some("Author_1"))).unwrap();
        service.create_book(params("Title 2", Some("Author_1"))).unwrap();

        let author = service.get_author(&first.authors[0].id).unwrap();
        let titles: Vec<&str> = author.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Title 1", "Title 2"]);
    }
}
