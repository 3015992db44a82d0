//! Proposal entity - A user-submitted candidate game awaiting moderation.
//!
//! The moderation outcome is an explicit [`ProposalState`] column. A proposal starts
//! as [`ProposalState::Pending`]; both other states are terminal. Approving a
//! proposal copies its fields into a new game (see [`Model::draft`]); the proposal
//! row itself is kept.

use super::IdSet;
use crate::models::GameDraft;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation state of a proposal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalState {
    /// Waiting for an administrator
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Accepted; a game was created from it
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Turned down
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ProposalState {
    /// Wire/database spelling of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Approved and rejected proposals never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `PENDING -> APPROVED` and `PENDING -> REJECTED` exist.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected)
        )
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proposal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    /// Unique identifier for the proposal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Proposed title
    pub title: String,
    /// Proposed description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Proposed price
    pub price: f64,
    /// Proposed minimum age
    pub min_age: i32,
    /// Developer studio name
    pub developer: String,
    /// Cover image URI
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
    /// User who submitted the proposal
    pub submitted_by: i64,
    /// Moderation state
    pub state: ProposalState,
    /// Submission time
    pub created_at: DateTimeUtc,
    /// Last state change
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// The game this proposal would become if approved.
    #[must_use]
    pub fn draft(&self) -> GameDraft {
        GameDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            min_age: self.min_age,
            developer: self.developer.clone(),
            cover_image: self.cover_image.clone(),
            cover_alt: self.cover_alt.clone(),
            genres: self.genres.clone(),
            platforms: self.platforms.clone(),
            accessibility_tags: self.accessibility_tags.clone(),
        }
    }
}

/// Defines relationships between Proposal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each proposal is submitted by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubmittedBy",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
