use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{seed_catalog, Book, BookId, Transaction, TxAction, TxId, User, UserId};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// The interaction store: user table, book catalog, and append-only
/// transaction log
///
/// Handlers take the write lock to register users and append events, and
/// the read lock to hand the engine a consistent snapshot.
pub struct AppStateInner {
    pub users: HashMap<UserId, User>,
    pub books: BTreeMap<BookId, Book>,
    pub transactions: Vec<Transaction>,
    next_user_id: UserId,
    next_tx_id: TxId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates state with an empty catalog
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// Creates state seeded with the standard catalog
    pub fn seeded() -> Self {
        Self::with_books(seed_catalog())
    }

    /// Creates state over the given catalog
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::with_books(books))),
        }
    }
}

impl AppStateInner {
    fn with_books(books: Vec<Book>) -> Self {
        Self {
            users: HashMap::new(),
            books: books.into_iter().map(|book| (book.book_id, book)).collect(),
            transactions: Vec::new(),
            next_user_id: 1,
            next_tx_id: 1,
        }
    }

    /// Registers a username, or returns the existing user with that name
    ///
    /// The second element is true when a new user was created.
    pub fn register_user(&mut self, username: &str) -> (User, bool) {
        if let Some(existing) = self.users.values().find(|user| user.username == username) {
            return (existing.clone(), false);
        }

        let user = User::new(self.next_user_id, username.to_string());
        self.next_user_id += 1;
        self.users.insert(user.user_id, user.clone());
        (user, true)
    }

    /// Appends a borrow/return event to the log
    ///
    /// The log is append-only and no borrow-state consistency is enforced
    /// here; derived state follows the latest-action rule.
    pub fn append_transaction(
        &mut self,
        user_id: UserId,
        book_id: BookId,
        action: TxAction,
    ) -> Transaction {
        let tx = Transaction::new(self.next_tx_id, user_id, book_id, action, Utc::now());
        self.next_tx_id += 1;
        self.transactions.push(tx.clone());
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut inner = AppStateInner::with_books(Vec::new());
        let (alice, created) = inner.register_user("alice");
        assert!(created);
        assert_eq!(alice.user_id, 1);

        let (bob, created) = inner.register_user("bob");
        assert!(created);
        assert_eq!(bob.user_id, 2);
    }

    #[test]
    fn test_register_is_idempotent_per_username() {
        let mut inner = AppStateInner::with_books(Vec::new());
        let (first, _) = inner.register_user("alice");
        let (second, created) = inner.register_user("alice");
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(inner.users.len(), 1);
    }

    #[test]
    fn test_append_transaction_allocates_ids_in_order() {
        let mut inner = AppStateInner::with_books(seed_catalog());
        let first = inner.append_transaction(1, 1, TxAction::Borrow);
        let second = inner.append_transaction(1, 1, TxAction::Return);
        assert_eq!(first.tx_id, 1);
        assert_eq!(second.tx_id, 2);
        assert_eq!(inner.transactions.len(), 2);
    }

    #[test]
    fn test_seeded_state_has_full_catalog() {
        let inner = AppStateInner::with_books(seed_catalog());
        assert_eq!(inner.books.len(), 27);
        assert_eq!(inner.books.get(&1).unwrap().title, "1984");
    }
}
