//! Catalog filter/sort engine.
//!
//! A pure function from (games, filter, sort, favorites, comments) to an ordered
//! view. Inputs are never mutated; the view borrows the games it selects.
//!
//! Filtering is by id equality against the relation sets, so a game keeps matching
//! a genre filter even when that genre id no longer resolves to a taxonomy entry.
//! All sorts are stable: ties keep the order the games had in the input.

use crate::entities::{IdSet, comment, game};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

/// Constraints on the catalog. Every `None` field is "no constraint"; the set
/// fields are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the title, spaces included. A blank needle
    /// is no constraint.
    pub name: Option<String>,
    pub accessibility_tag: Option<i64>,
    pub genre: Option<i64>,
    pub platform: Option<i64>,
    /// Inclusive lower price bound. NaN and infinities are ignored.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound. NaN and infinities are ignored.
    pub max_price: Option<f64>,
}

impl CatalogFilter {
    /// Whether `game` satisfies every active constraint.
    #[must_use]
    pub fn matches(&self, game: &game::Model) -> bool {
        let name_ok = self.name.as_deref().is_none_or(|needle| {
            needle.trim().is_empty()
                || game.title.to_lowercase().contains(&needle.to_lowercase())
        });

        name_ok
            && self
                .accessibility_tag
                .is_none_or(|id| game.accessibility_tags.contains(id))
            && self.genre.is_none_or(|id| game.genres.contains(id))
            && self.platform.is_none_or(|id| game.platforms.contains(id))
            && self
                .min_price
                .filter(|min| min.is_finite())
                .is_none_or(|min| game.price >= min)
            && self
                .max_price
                .filter(|max| max.is_finite())
                .is_none_or(|max| game.price <= max)
    }

    /// True when no constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Orderings the catalog can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    AgeAsc,
    AgeDesc,
    /// Favorites before everything else, no ordering within each group
    FavoritesFirst,
    /// Most commented first
    MostCommented,
}

impl SortOrder {
    const ALL: [Self; 6] = [
        Self::PriceAsc,
        Self::PriceDesc,
        Self::AgeAsc,
        Self::AgeDesc,
        Self::FavoritesFirst,
        Self::MostCommented,
    ];

    /// Selector spelling used by the UI layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::AgeAsc => "age-asc",
            Self::AgeDesc => "age-desc",
            Self::FavoritesFirst => "favorites-first",
            Self::MostCommented => "most-commented",
        }
    }

    /// Parses a UI selector; the empty selector means "no reordering".
    pub fn parse_selector(selector: &str) -> Result<Option<Self>, UnknownSortOrder> {
        let selector = selector.trim();
        if selector.is_empty() {
            Ok(None)
        } else {
            selector.parse().map(Some)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort selector that names no known ordering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}'")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}

/// Filter plus optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub filter: CatalogFilter,
    pub sort: Option<SortOrder>,
}

/// Number of comments per game id.
#[must_use]
pub fn comment_counts(comments: &[comment::Model]) -> HashMap<i64, usize> {
    comments.iter().fold(HashMap::new(), |mut counts, c| {
        *counts.entry(c.game_id).or_insert(0) += 1;
        counts
    })
}

/// Stable in-place sort of a view.
///
/// Comment counts are computed once per call rather than per comparison.
pub fn sort_games(
    games: &mut [&game::Model],
    order: SortOrder,
    favorites: &IdSet,
    comments: &[comment::Model],
) {
    match order {
        SortOrder::PriceAsc => games.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDesc => games.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOrder::AgeAsc => games.sort_by_key(|g| g.min_age),
        SortOrder::AgeDesc => games.sort_by(|a, b| b.min_age.cmp(&a.min_age)),
        SortOrder::FavoritesFirst => games.sort_by(|a, b| {
            match (favorites.contains(a.id), favorites.contains(b.id)) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        }),
        SortOrder::MostCommented => {
            let counts = comment_counts(comments);
            let count = |id: i64| counts.get(&id).copied().unwrap_or(0);
            games.sort_by(|a, b| count(b.id).cmp(&count(a.id)));
        }
    }
}

/// Produces the catalog view for `query`.
///
/// `favorites` is only consulted by [`SortOrder::FavoritesFirst`] and `comments`
/// only by [`SortOrder::MostCommented`].
#[must_use]
pub fn catalog_view<'a>(
    games: &'a [game::Model],
    query: &CatalogQuery,
    favorites: &IdSet,
    comments: &[comment::Model],
) -> Vec<&'a game::Model> {
    let mut view: Vec<&game::Model> = games.iter().filter(|g| query.filter.matches(g)).collect();
    if let Some(order) = query.sort {
        sort_games(&mut view, order, favorites, comments);
    }
    view
}

/// Games in `favorites`, in catalog order.
#[must_use]
pub fn favorite_games<'a>(games: &'a [game::Model], favorites: &IdSet) -> Vec<&'a game::Model> {
    games.iter().filter(|g| favorites.contains(g.id)).collect()
}
