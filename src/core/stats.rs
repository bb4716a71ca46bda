//! Per-book review statistics
//!
//! Averages and counts are never stored; they are recomputed from the live
//! review rows every time a listing is built.

use crate::db::models::{Book, Review};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A book together with the statistics derived from its reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWithStats {
    #[serde(flatten)]
    pub book: Book,
    /// Mean review score, `None` when the book has no reviews
    pub average_score: Option<f64>,
    pub review_count: usize,
}

#[derive(Default)]
struct Tally {
    sum: i64,
    count: usize,
}

/// Projects review rows onto the books they belong to
pub struct StatsProjector;

impl StatsProjector {
    /// Attach `average_score` and `review_count` to every book.
    ///
    /// Books keep their input order. A book without reviews is still
    /// projected, with a count of 0 and no average. Reviews whose book is not
    /// in `books` are ignored.
    pub fn project(books: Vec<Book>, reviews: &[Review]) -> Vec<BookWithStats> {
        let mut tallies: HashMap<&str, Tally> = HashMap::with_capacity(books.len());
        for review in reviews {
            let tally = tallies.entry(review.book_id.as_str()).or_default();
            tally.sum += i64::from(review.score);
            tally.count += 1;
        }

        books
            .into_iter()
            .map(|book| {
                let (average_score, review_count) = match tallies.get(book.id.as_str()) {
                    Some(t) if t.count > 0 => (Some(t.sum as f64 / t.count as f64), t.count),
                    _ => (None, 0),
                };
                BookWithStats {
                    book,
                    average_score,
                    review_count,
                }
            })
            .collect()
    }
}
