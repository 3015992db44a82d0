//! Which screen the application shows, as an explicit state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    Home,
    Catalog,
    Favorites,
    Proposals,
    Login,
    /// Detail page of one game
    Detail(i64),
    Accessibility,
}

impl View {
    /// Screens that only make sense for a logged-in user.
    #[must_use]
    pub const fn requires_login(self) -> bool {
        matches!(self, Self::Favorites | Self::Proposals)
    }

    /// The screen actually shown when `target` is requested.
    ///
    /// Protected screens redirect to [`View::Login`] when nobody is logged in.
    #[must_use]
    pub const fn navigate(target: Self, logged_in: bool) -> Self {
        if target.requires_login() && !logged_in {
            Self::Login
        } else {
            target
        }
    }

    /// The screen to fall back to once the user logs out.
    #[must_use]
    pub const fn after_logout(self) -> Self {
        if self.requires_login() { Self::Home } else { self }
    }

    /// The screen to show once a login succeeds.
    #[must_use]
    pub const fn after_login(self) -> Self {
        match self {
            Self::Login => Self::Home,
            other => other,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Catalog => f.write_str("catalog"),
            Self::Favorites => f.write_str("favorites"),
            Self::Proposals => f.write_str("proposals"),
            Self::Login => f.write_str("login"),
            Self::Detail(id) => write!(f, "detail/{id}"),
            Self::Accessibility => f.write_str("accessibility"),
        }
    }
}
