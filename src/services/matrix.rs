use std::collections::BTreeMap;

use crate::models::{BookId, Transaction, TxAction, UserId};

/// User×book borrow-count matrix derived from the transaction log
///
/// Rows exist only for users with at least one borrow event; the cell for
/// a (user, book) pair counts that user's borrow actions for the book.
/// Returns never decrement a count: the matrix measures historical
/// engagement, not current holding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionMatrix {
    rows: BTreeMap<UserId, BTreeMap<BookId, u32>>,
}

impl InteractionMatrix {
    /// Builds the matrix from the ordered transaction log
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut rows: BTreeMap<UserId, BTreeMap<BookId, u32>> = BTreeMap::new();
        for tx in transactions {
            if tx.action == TxAction::Borrow {
                *rows
                    .entry(tx.user_id)
                    .or_default()
                    .entry(tx.book_id)
                    .or_insert(0) += 1;
            }
        }
        Self { rows }
    }

    /// True when no user has any borrow event
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The count row for a user, if they have at least one borrow
    pub fn row(&self, user_id: UserId) -> Option<&BTreeMap<BookId, u32>> {
        self.rows.get(&user_id)
    }

    /// Users with at least one borrow event, ascending id
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.rows.keys().copied()
    }

    /// Total borrow count per book across all users
    pub fn global_counts(&self) -> BTreeMap<BookId, u64> {
        let mut counts: BTreeMap<BookId, u64> = BTreeMap::new();
        for row in self.rows.values() {
            for (&book_id, &count) in row {
                *counts.entry(book_id).or_insert(0) += u64::from(count);
            }
        }
        counts
    }
}
