//! Taxonomy join - Resolves relation id sets into display names.
//!
//! Games store only foreign ids. Names are looked up here at render time and ids
//! with no matching taxonomy entry are dropped without error.

use crate::entities::{IdSet, accessibility_tag, comment, game, genre, platform};
use serde::Serialize;
use std::collections::HashMap;

/// A taxonomy record that can be shown by name.
pub trait Named {
    /// Primary key
    fn id(&self) -> i64;
    /// Display name
    fn name(&self) -> &str;
}

impl Named for genre::Model {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for platform::Model {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for accessibility_tag::Model {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Names of the entries in `ids`, in id order. Stale ids are skipped.
#[must_use]
pub fn resolve_names<T: Named>(ids: &IdSet, entries: &[T]) -> Vec<String> {
    let by_id: HashMap<i64, &str> = entries.iter().map(|e| (e.id(), e.name())).collect();
    ids.iter()
        .filter_map(|id| by_id.get(&id).map(|name| (*name).to_string()))
        .collect()
}

/// Borrowed view of the three taxonomy collections.
#[derive(Debug, Clone, Copy)]
pub struct Taxonomy<'a> {
    pub genres: &'a [genre::Model],
    pub platforms: &'a [platform::Model],
    pub accessibility_tags: &'a [accessibility_tag::Model],
}

/// A game joined with its taxonomy names and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    pub game: game::Model,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub accessibility_tags: Vec<String>,
    pub comments: Vec<comment::Model>,
}

impl Taxonomy<'_> {
    /// Builds the detail record for `game`. Only comments on this game are kept.
    #[must_use]
    pub fn detail(&self, game: &game::Model, comments: &[comment::Model]) -> GameDetail {
        GameDetail {
            game: game.clone(),
            genres: resolve_names(&game.genres, self.genres),
            platforms: resolve_names(&game.platforms, self.platforms),
            accessibility_tags: resolve_names(&game.accessibility_tags, self.accessibility_tags),
            comments: comments
                .iter()
                .filter(|c| c.game_id == game.id)
                .cloned()
                .collect(),
        }
    }
}
