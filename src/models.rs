//! Records exchanged with the Remote Data Gateway that do not map one-to-one onto a
//! table row.

use crate::entities::{IdSet, user};
use serde::{Deserialize, Serialize};

/// Every field a game is created from, without an id.
///
/// Used both for direct catalog entries and as the payload of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub min_age: i32,
    pub developer: String,
    pub cover_image: Option<String>,
    pub cover_alt: Option<String>,
    pub genres: IdSet,
    pub platforms: IdSet,
    pub accessibility_tags: IdSet,
}

/// A user as the client sees it: account fields plus the favorites relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
    /// Favorite game ids
    pub favorites: IdSet,
    /// Preferred accessibility tag ids
    pub preferences: IdSet,
}

impl UserProfile {
    /// Builds a profile from a user row and the user's favorite game ids.
    #[must_use]
    pub fn from_model(user: user::Model, favorites: IdSet) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            is_admin: user.is_admin,
            favorites,
            preferences: user.preferences,
        }
    }
}

/// Registration form contents.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub preferences: IdSet,
}

/// Access/refresh token pair issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub tokens: Option<AuthTokens>,
}
