//! Normalized entity structs.

use serde::{Deserialize, Serialize};

/// Identifier of a user profile. Doubles as the selection key.
pub type UserId = u64;

/// A single profile returned by the lookup service.
///
/// Only the fields the screen needs are kept; anything else the remote payload
/// carries (`node_id`, `score`, the various `*_url` links) is ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

impl UserRecord {
    pub fn new(id: UserId, login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            id,
            avatar_url: format!("https://avatars.githubusercontent.com/u/{id}"),
            html_url: format!("https://github.com/{login}"),
            login,
        }
    }
}

/// One page of search results, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSet {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<UserRecord>,
}

impl ResultSet {
    pub fn new(items: Vec<UserRecord>) -> Self {
        Self {
            total_count: items.len() as u64,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.items.iter().any(|u| u.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.items.iter().map(|u| u.id)
    }
}
