use std::collections::BTreeMap;

use super::matrix::InteractionMatrix;
use crate::models::{BookId, UserId};

/// Pairwise cosine similarity between the matrix's user rows
///
/// Scores are symmetric and lie in [-1, 1]; self-similarity is 1 for any
/// non-zero row. Recomputed fresh per request; at this catalog scale the
/// O(U²·B) cost is acceptable and avoids staleness.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: BTreeMap<(UserId, UserId), f64>,
}

impl SimilarityMatrix {
    /// Computes similarity for every ordered pair of matrix users
    pub fn from_matrix(matrix: &InteractionMatrix) -> Self {
        let users: Vec<UserId> = matrix.users().collect();
        let mut scores = BTreeMap::new();

        for (i, &a) in users.iter().enumerate() {
            for &b in &users[i..] {
                let score = match (matrix.row(a), matrix.row(b)) {
                    (Some(row_a), Some(row_b)) => cosine_similarity(row_a, row_b),
                    _ => 0.0,
                };
                scores.insert((a, b), score);
                scores.insert((b, a), score);
            }
        }

        Self { scores }
    }

    /// Similarity between two users, 0.0 for pairs outside the matrix
    pub fn get(&self, a: UserId, b: UserId) -> f64 {
        self.scores.get(&(a, b)).copied().unwrap_or(0.0)
    }
}

/// Cosine similarity of two sparse count rows over the shared column space
///
/// Books absent from a row count as zero. Returns 0.0 when either row has
/// zero magnitude rather than dividing by zero.
pub fn cosine_similarity(a: &BTreeMap<BookId, u32>, b: &BTreeMap<BookId, u32>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(book_id, &count)| {
            b.get(book_id)
                .map(|&other| f64::from(count) * f64::from(other))
        })
        .sum();

    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot / (magnitude_a * magnitude_b)
}

fn magnitude(row: &BTreeMap<BookId, u32>) -> f64 {
    row.values()
        .map(|&count| f64::from(count) * f64::from(count))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TxAction};
    use chrono::Utc;

    fn row(counts: &[(BookId, u32)]) -> BTreeMap<BookId, u32> {
        counts.iter().copied().collect()
    }

    fn borrow(tx_id: u64, user_id: UserId, book_id: BookId) -> Transaction {
        Transaction::new(tx_id, user_id, book_id, TxAction::Borrow, Utc::now())
    }

    #[test]
    fn test_known_cosine_value() {
        // [2, 1, 0] vs [0, 1, 2]: dot = 1, magnitudes √5 each
        let a = row(&[(1, 2), (2, 1)]);
        let b = row(&[(2, 1), (3, 2)]);
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_magnitude_guard() {
        let empty = row(&[]);
        let other = row(&[(1, 3)]);
        assert_eq!(cosine_similarity(&empty, &other), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let log = vec![
            borrow(1, 1, 10),
            borrow(2, 1, 11),
            borrow(3, 2, 11),
            borrow(4, 2, 12),
            borrow(5, 3, 10),
        ];
        let matrix = InteractionMatrix::from_transactions(&log);
        let similarities = SimilarityMatrix::from_matrix(&matrix);

        for a in matrix.users() {
            for b in matrix.users() {
                assert_eq!(similarities.get(a, b), similarities.get(b, a));
            }
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let log = vec![borrow(1, 1, 10), borrow(2, 1, 11), borrow(3, 2, 10)];
        let matrix = InteractionMatrix::from_transactions(&log);
        let similarities = SimilarityMatrix::from_matrix(&matrix);

        for user in matrix.users() {
            assert!((similarities.get(user, user) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_pair_scores_zero() {
        let matrix = InteractionMatrix::from_transactions(&[]);
        let similarities = SimilarityMatrix::from_matrix(&matrix);
        assert_eq!(similarities.get(1, 2), 0.0);
    }
}
