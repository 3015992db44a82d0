//! Game entity - A catalog entry and its accessibility metadata.
//!
//! Relations to genres, platforms and accessibility tags are stored as id sets on
//! the row itself. Games are created directly (seeding, admin tooling) or by
//! approving a proposal.

use super::IdSet;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Game database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    /// Unique identifier for the game
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display title
    pub title: String,
    /// Free-form description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Price, never negative
    pub price: f64,
    /// Minimum recommended age (3, 6, 9, 12, 16 or 18)
    pub min_age: i32,
    /// Developer studio name
    pub developer: String,
    /// Cover image URI, passed through untouched
    pub cover_image: Option<String>,
    /// Alternative text for the cover image
    pub cover_alt: Option<String>,
    /// Genre ids
    #[sea_orm(column_type = "Text")]
    pub genres: IdSet,
    /// Platform ids
    #[sea_orm(column_type = "Text")]
    pub platforms: IdSet,
    /// Accessibility tag ids
    #[sea_orm(column_type = "Text")]
    pub accessibility_tags: IdSet,
    /// When the game was added to the catalog
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Game and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One game has many comments
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    /// One game is favorited by many users
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
