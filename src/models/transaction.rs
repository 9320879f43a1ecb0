use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, UserId};

/// Identifier for an entry in the transaction log
pub type TxId = u64;

/// Action recorded by a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TxAction {
    Borrow,
    Return,
}

/// A single borrow/return event
///
/// The log is append-only: events are never updated or deleted, and the
/// current borrow state of a (user, book) pair is derived from the latest
/// event for that pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub tx_id: TxId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub action: TxAction,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new log entry
    pub fn new(
        tx_id: TxId,
        user_id: UserId,
        book_id: BookId,
        action: TxAction,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            user_id,
            book_id,
            action,
            timestamp,
        }
    }
}
