pub mod book;
pub mod transaction;
pub mod user;

pub use book::{seed_catalog, Book, BookId, Genre};
pub use transaction::{Transaction, TxAction, TxId};
pub use user::{User, UserId};
