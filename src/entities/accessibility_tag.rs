//! Accessibility tag entity - Describes an accessibility feature a game supports
//! (subtitles, colour-blind modes, one-handed controls...). Users also keep a set
//! of preferred tags.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accessibility tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accessibility_tags")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short display name
    #[sea_orm(unique)]
    pub name: String,
    /// Longer explanation of the feature
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

/// Tags are referenced by id from game, proposal and preference id sets
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
