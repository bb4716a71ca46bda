//! Best and worst reviews of a single book

use crate::db::models::Review;

/// Number of reviews selected when the caller does not ask for a limit
pub const DEFAULT_REVIEW_LIMIT: usize = 3;

/// Selects a book's highest- or lowest-scored reviews
pub struct ReviewRanker;

impl ReviewRanker {
    /// Up to `n` reviews, highest score first; equal scores keep input order
    pub fn top(mut reviews: Vec<Review>, n: usize) -> Vec<Review> {
        reviews.sort_by(|a, b| b.score.cmp(&a.score));
        reviews.truncate(n);
        reviews
    }

    /// Up to `n` reviews, lowest score first; equal scores keep input order
    pub fn bottom(mut reviews: Vec<Review>, n: usize) -> Vec<Review> {
        reviews.sort_by(|a, b| a.score.cmp(&b.score));
        reviews.truncate(n);
        reviews
    }
}
