//! User entity - A registered account.
//!
//! Favorites live in their own table so that adding and removing one is a single
//! row operation; accessibility preferences are an id set on the row.

use super::IdSet;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, also the login name
    #[sea_orm(unique)]
    pub name: String,
    /// Contact email
    pub email: String,
    /// Optional avatar URI
    pub avatar: Option<String>,
    /// Grants proposal moderation
    pub is_admin: bool,
    /// Random per-user salt mixed into the password digest
    #[serde(skip_serializing)]
    pub password_salt: String,
    /// Hex SHA-256 digest of salt and password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Preferred accessibility tag ids
    #[sea_orm(column_type = "Text")]
    pub preferences: IdSet,
    /// Registration time
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user writes many comments
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    /// One user marks many favorites
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
    /// One user submits many proposals
    #[sea_orm(has_many = "super::proposal::Entity")]
    Proposals,
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

impl Related<super::proposal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
