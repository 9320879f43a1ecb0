use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::{Book, BookId, Genre, Transaction, TxAction, UserId};

/// Reason tag attached to a recommendation
///
/// Purely presentational metadata; never affects ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// Ranked by global popularity because the user has no borrow history
    PopularFallback,
    /// Voted up by users with similar borrowing patterns
    SimilarReaders,
    /// The book's genre appears in the user's favorite genres
    GenreMatch,
}

impl Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Reason::PopularFallback => "Popular among readers",
            Reason::SimilarReaders => "Similar readers",
            Reason::GenreMatch => "Genre match",
        };
        write!(f, "{}", text)
    }
}

/// Distinct genres of the user's borrowed books, ordered by borrow-event
/// frequency descending
///
/// Every borrow event counts, so borrowing the same book twice weighs its
/// genre twice. Ties break by genre declaration order.
pub fn favorite_genres(
    user_id: UserId,
    transactions: &[Transaction],
    books: &BTreeMap<BookId, Book>,
) -> Vec<Genre> {
    let mut counts: BTreeMap<Genre, u32> = BTreeMap::new();
    for tx in transactions {
        if tx.user_id == user_id && tx.action == TxAction::Borrow {
            if let Some(book) = books.get(&tx.book_id) {
                *counts.entry(book.genre).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(Genre, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().map(|(genre, _)| genre).collect()
}

/// Reason tags for a book reached through the similarity path
pub fn similarity_reasons(book: &Book, favorites: &[Genre]) -> Vec<Reason> {
    let mut reasons = vec![Reason::SimilarReaders];
    if favorites.contains(&book.genre) {
        reasons.push(Reason::GenreMatch);
    }
    reasons
}

/// Joins reason tags into the display line shown alongside a recommendation
pub fn explanation_line(reasons: &[Reason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn catalog() -> BTreeMap<BookId, Book> {
        [
            Book::new(1, "1984".to_string(), Genre::Dystopian),
            Book::new(2, "Dune".to_string(), Genre::ScienceFiction),
            Book::new(3, "Sapiens".to_string(), Genre::History),
        ]
        .into_iter()
        .map(|book| (book.book_id, book))
        .collect()
    }

    fn borrow(tx_id: u64, user_id: UserId, book_id: BookId) -> Transaction {
        Transaction::new(tx_id, user_id, book_id, TxAction::Borrow, Utc::now())
    }

    #[test]
    fn test_favorite_genres_ordered_by_frequency() {
        let log = vec![
            borrow(1, 1, 2),
            borrow(2, 1, 2),
            borrow(3, 1, 1),
            borrow(4, 2, 3),
        ];

        let favorites = favorite_genres(1, &log, &catalog());
        assert_eq!(favorites, vec![Genre::ScienceFiction, Genre::Dystopian]);
    }

    #[test]
    fn test_favorite_genres_empty_without_history() {
        let favorites = favorite_genres(1, &[], &catalog());
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_genre_match_appended_for_favorite_genre() {
        let books = catalog();
        let favorites = vec![Genre::ScienceFiction];

        let dune = books.get(&2).unwrap();
        assert_eq!(
            similarity_reasons(dune, &favorites),
            vec![Reason::SimilarReaders, Reason::GenreMatch]
        );

        let sapiens = books.get(&3).unwrap();
        assert_eq!(similarity_reasons(sapiens, &favorites), vec![Reason::SimilarReaders]);
    }

    #[test]
    fn test_explanation_line() {
        let line = explanation_line(&[Reason::SimilarReaders, Reason::GenreMatch]);
        assert_eq!(line, "Similar readers · Genre match");
        assert_eq!(explanation_line(&[Reason::PopularFallback]), "Popular among readers");
    }

    #[test]
    fn test_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&Reason::PopularFallback).unwrap(),
            "\"popular-fallback\""
        );
        assert_eq!(
            serde_json::to_string(&Reason::SimilarReaders).unwrap(),
            "\"similar-readers\""
        );
        assert_eq!(serde_json::to_string(&Reason::GenreMatch).unwrap(), "\"genre-match\"");
    }
}
