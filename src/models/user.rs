use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the store, sequential from 1
pub type UserId = u64;

/// A registered library member
///
/// Created on first registration and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
}

impl User {
    /// Creates a new user record
    pub fn new(user_id: UserId, username: String) -> Self {
        Self { user_id, username }
    }
}
