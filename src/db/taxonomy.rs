//! Taxonomy persistence - Genres, platforms and accessibility tags.
//!
//! These tables are reference data: the client lists them once per session. The
//! create functions exist for seeding.

use crate::{
    entities::{AccessibilityTag, Genre, Platform, accessibility_tag, genre, platform},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// All genres ordered by id.
pub async fn list_genres(db: &DatabaseConnection) -> Result<Vec<genre::Model>> {
    Genre::find()
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All platforms ordered by id.
pub async fn list_platforms(db: &DatabaseConnection) -> Result<Vec<platform::Model>> {
    Platform::find()
        .order_by_asc(platform::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All accessibility tags ordered by id.
pub async fn list_accessibility_tags(
    db: &DatabaseConnection,
) -> Result<Vec<accessibility_tag::Model>> {
    AccessibilityTag::find()
        .order_by_asc(accessibility_tag::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn create_genre(db: &DatabaseConnection, name: &str) -> Result<genre::Model> {
    genre::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn create_platform(db: &DatabaseConnection, name: &str) -> Result<platform::Model> {
    platform::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn create_accessibility_tag(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<accessibility_tag::Model> {
    accessibility_tag::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
