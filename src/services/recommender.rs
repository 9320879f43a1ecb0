use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use super::explain::{self, Reason};
use super::matrix::InteractionMatrix;
use super::similarity::SimilarityMatrix;
use crate::models::{Book, BookId, Transaction, TxAction, User, UserId};

/// Maximum number of books in a single recommendation list
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Error types for the recommender
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
}

/// A ranked book suggestion with its score and reason tags
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub book_id: BookId,
    pub score: f64,
    pub reasons: Vec<Reason>,
}

/// Recommendation engine over a read-only snapshot of the store
///
/// Holds no state between calls: every query rebuilds the interaction
/// matrix from the transaction log, so results always reflect the
/// snapshot it was constructed with.
pub struct Recommender<'a> {
    users: &'a HashMap<UserId, User>,
    books: &'a BTreeMap<BookId, Book>,
    transactions: &'a [Transaction],
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over the given snapshot
    pub fn new(
        users: &'a HashMap<UserId, User>,
        books: &'a BTreeMap<BookId, Book>,
        transactions: &'a [Transaction],
    ) -> Self {
        Self {
            users,
            books,
            transactions,
        }
    }

    /// Ranked recommendations for a user, best first
    ///
    /// Users with borrow history get similarity-weighted neighbor voting;
    /// users without any get the global popularity fallback. An empty
    /// transaction log yields an empty list.
    pub fn recommend(&self, user_id: UserId) -> Result<Vec<Recommendation>, RecommenderError> {
        self.ensure_known(user_id)?;

        let matrix = InteractionMatrix::from_transactions(self.transactions);
        if matrix.is_empty() {
            return Ok(Vec::new());
        }

        let recommendations = match matrix.row(user_id) {
            Some(row) => self.similarity_ranking(user_id, row, &matrix),
            None => self.popularity_fallback(&matrix),
        };

        tracing::debug!(
            user_id,
            transactions = self.transactions.len(),
            count = recommendations.len(),
            "ranked recommendations"
        );
        Ok(recommendations)
    }

    /// Book ids the user currently holds, by the latest-action rule
    ///
    /// The log may contain repeated borrow/return cycles; only the most
    /// recent action per book decides. Log anomalies (returns without a
    /// borrow) are not repaired, they simply resolve to "not borrowed".
    pub fn current_borrows(&self, user_id: UserId) -> Result<BTreeSet<BookId>, RecommenderError> {
        self.ensure_known(user_id)?;

        let mut latest: BTreeMap<BookId, TxAction> = BTreeMap::new();
        for tx in self.transactions {
            if tx.user_id == user_id {
                latest.insert(tx.book_id, tx.action);
            }
        }

        Ok(latest
            .into_iter()
            .filter(|&(_, action)| action == TxAction::Borrow)
            .map(|(book_id, _)| book_id)
            .collect())
    }

    /// The n most-borrowed books with their counts, descending
    ///
    /// Only books with at least one borrow qualify; ties break by
    /// ascending book id.
    pub fn top_popular(&self, n: usize) -> Vec<(BookId, u64)> {
        let counts = InteractionMatrix::from_transactions(self.transactions).global_counts();
        let mut ranked: Vec<(BookId, u64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Similarity-weighted neighbor vote over the user's co-readers
    ///
    /// Books the user has ever borrowed are excluded outright; the rest of
    /// the catalog stays eligible even at zero score so small candidate
    /// pools still fill the list.
    fn similarity_ranking(
        &self,
        user_id: UserId,
        row: &BTreeMap<BookId, u32>,
        matrix: &InteractionMatrix,
    ) -> Vec<Recommendation> {
        let similarities = SimilarityMatrix::from_matrix(matrix);

        let mut scores: BTreeMap<BookId, f64> = BTreeMap::new();
        for other in matrix.users() {
            if other == user_id {
                continue;
            }
            let sim = similarities.get(user_id, other);
            if let Some(other_row) = matrix.row(other) {
                for (&book_id, &count) in other_row {
                    *scores.entry(book_id).or_insert(0.0) += sim * f64::from(count);
                }
            }
        }

        let favorites = explain::favorite_genres(user_id, self.transactions, self.books);

        let mut ranked: Vec<Recommendation> = self
            .books
            .values()
            .filter(|book| !row.contains_key(&book.book_id))
            .map(|book| Recommendation {
                book_id: book.book_id,
                score: scores.get(&book.book_id).copied().unwrap_or(0.0),
                reasons: explain::similarity_reasons(book, &favorites),
            })
            .collect();

        rank(&mut ranked);
        ranked
    }

    /// Global popularity ranking over the full catalog
    ///
    /// Used when the target user has no borrow history. Catalog books
    /// nobody borrowed rank at zero, so a small catalog still fills.
    fn popularity_fallback(&self, matrix: &InteractionMatrix) -> Vec<Recommendation> {
        let counts = matrix.global_counts();

        let mut ranked: Vec<Recommendation> = self
            .books
            .keys()
            .map(|&book_id| Recommendation {
                book_id,
                score: counts.get(&book_id).copied().unwrap_or(0) as f64,
                reasons: vec![Reason::PopularFallback],
            })
            .collect();

        rank(&mut ranked);
        ranked
    }

    fn ensure_known(&self, user_id: UserId) -> Result<(), RecommenderError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RecommenderError::UnknownUser(user_id))
        }
    }
}

/// Sorts by score descending with ascending book id as the tie-break, then
/// caps the list
fn rank(recommendations: &mut Vec<Recommendation>) {
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.book_id.cmp(&b.book_id))
    });
    recommendations.truncate(MAX_RECOMMENDATIONS);
}
