//! Orderings over projected books
//!
//! [`SortDispatcher`] applies one of the fixed listing orders selected by a
//! [`SortToken`]. [`ExceptionalSelector`] ranks the whole collection by
//! average score, independent of whichever listing order produced it.
//!
//! Both are tolerant: an unknown token never fails, it selects the default.
//! All sorts are stable, so books with equal keys keep their input order.
//! A book with no reviews has no average and ranks below every scored book.

use crate::core::stats::BookWithStats;
use std::cmp::Ordering;
use std::fmt;

/// Listing order selected by a sort token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortToken {
    #[default]
    TitleAscending,
    TitleDescending,
    RatingAscending,
    RatingDescending,
    CountAscending,
    CountDescending,
    PagesAscending,
    PagesDescending,
}

#[derive(Debug, Clone, Copy)]
enum SortKey {
    Title,
    Rating,
    Count,
    Pages,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Ascending,
    Descending,
}

impl SortToken {
    pub const ALL: [SortToken; 8] = [
        SortToken::TitleAscending,
        SortToken::TitleDescending,
        SortToken::RatingAscending,
        SortToken::RatingDescending,
        SortToken::CountAscending,
        SortToken::CountDescending,
        SortToken::PagesAscending,
        SortToken::PagesDescending,
    ];

    /// Map a token to its order. Matching is exact and case-sensitive;
    /// anything unrecognized selects [`SortToken::TitleAscending`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "a_title" => SortToken::TitleAscending,
            "z_title" => SortToken::TitleDescending,
            "low_rating" => SortToken::RatingAscending,
            "high_rating" => SortToken::RatingDescending,
            "low_count" => SortToken::CountAscending,
            "high_count" => SortToken::CountDescending,
            "low_pages" => SortToken::PagesAscending,
            "high_pages" => SortToken::PagesDescending,
            _ => SortToken::default(),
        }
    }

    /// Like [`SortToken::from_token`], with an absent token selecting the default
    pub fn parse(token: Option<&str>) -> Self {
        token.map(Self::from_token).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortToken::TitleAscending => "a_title",
            SortToken::TitleDescending => "z_title",
            SortToken::RatingAscending => "low_rating",
            SortToken::RatingDescending => "high_rating",
            SortToken::CountAscending => "low_count",
            SortToken::CountDescending => "high_count",
            SortToken::PagesAscending => "low_pages",
            SortToken::PagesDescending => "high_pages",
        }
    }

    fn key_and_direction(self) -> (SortKey, Direction) {
        use Direction::*;
        match self {
            SortToken::TitleAscending => (SortKey::Title, Ascending),
            SortToken::TitleDescending => (SortKey::Title, Descending),
            SortToken::RatingAscending => (SortKey::Rating, Ascending),
            SortToken::RatingDescending => (SortKey::Rating, Descending),
            SortToken::CountAscending => (SortKey::Count, Ascending),
            SortToken::CountDescending => (SortKey::Count, Descending),
            SortToken::PagesAscending => (SortKey::Pages, Ascending),
            SortToken::PagesDescending => (SortKey::Pages, Descending),
        }
    }
}

impl From<&str> for SortToken {
    fn from(token: &str) -> Self {
        SortToken::from_token(token)
    }
}

impl fmt::Display for SortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare average scores; an undefined average is lower than any score
pub fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl SortKey {
    fn compare(self, a: &BookWithStats, b: &BookWithStats) -> Ordering {
        match self {
            SortKey::Title => a.book.title.cmp(&b.book.title),
            SortKey::Rating => compare_scores(a.average_score, b.average_score),
            SortKey::Count => a.review_count.cmp(&b.review_count),
            SortKey::Pages => a.book.pages.cmp(&b.book.pages),
        }
    }
}

/// Applies listing orders to projected books
pub struct SortDispatcher;

impl SortDispatcher {
    /// Reorder `books` by the order `token` selects
    pub fn apply(mut books: Vec<BookWithStats>, token: SortToken) -> Vec<BookWithStats> {
        let (key, direction) = token.key_and_direction();
        match direction {
            Direction::Ascending => books.sort_by(|a, b| key.compare(a, b)),
            // Swapping operands instead of reversing keeps ties in input order
            Direction::Descending => books.sort_by(|a, b| key.compare(b, a)),
        }
        books
    }
}

/// Which end of the score range comes first in an exceptional ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
    #[default]
    Top,
    Worst,
}

impl Ranking {
    /// `"worst"` selects [`Ranking::Worst`]; anything else ranks from the top
    pub fn from_token(token: &str) -> Self {
        match token {
            "worst" => Ranking::Worst,
            _ => Ranking::Top,
        }
    }
}

/// Ranks the full projected collection by average score alone
pub struct ExceptionalSelector;

impl ExceptionalSelector {
    /// Every book, best average first. Take the head for "the best book".
    pub fn top(books: Vec<BookWithStats>) -> Vec<BookWithStats> {
        SortDispatcher::apply(books, SortToken::RatingDescending)
    }

    /// Every book, worst average first
    pub fn worst(books: Vec<BookWithStats>) -> Vec<BookWithStats> {
        SortDispatcher::apply(books, SortToken::RatingAscending)
    }

    pub fn rank(books: Vec<BookWithStats>, ranking: Ranking) -> Vec<BookWithStats> {
        match ranking {
            Ranking::Top => Self::top(books),
            Ranking::Worst => Self::worst(books),
        }
    }
}
