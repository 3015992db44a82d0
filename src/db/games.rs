//! Game persistence - Creates and lists catalog entries.
//!
//! Field validation mirrors the rules applied to proposals so that a game created
//! from an approved proposal and one created directly obey the same constraints.

use crate::{
    core::validation,
    entities::{Game, game},
    errors::Result,
    models::GameDraft,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves every game in catalog order (ascending id).
pub async fn list_games(db: &DatabaseConnection) -> Result<Vec<game::Model>> {
    Game::find()
        .order_by_asc(game::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific game by its unique ID.
pub async fn get_game_by_id(db: &DatabaseConnection, game_id: i64) -> Result<Option<game::Model>> {
    Game::find_by_id(game_id).one(db).await.map_err(Into::into)
}

/// Inserts a new game after validating the draft.
///
/// # Errors
/// Returns an error if:
/// - Any draft field fails [`validation::validate_game_fields`]
/// - The database insert operation fails
#[instrument(skip(db, draft), fields(title = %draft.title))]
pub async fn create_game(db: &DatabaseConnection, draft: GameDraft) -> Result<game::Model> {
    validation::validate_game_fields(&draft)?;

    let game = game::ActiveModel {
        title: Set(draft.title.trim().to_string()),
        description: Set(draft.description),
        price: Set(draft.price),
        min_age: Set(draft.min_age),
        developer: Set(draft.developer.trim().to_string()),
        cover_image: Set(draft.cover_image),
        cover_alt: Set(draft.cover_alt),
        genres: Set(draft.genres),
        platforms: Set(draft.platforms),
        accessibility_tags: Set(draft.accessibility_tags),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = game.insert(db).await?;
    info!("Created game '{}' (ID: {})", created.title, created.id);
    Ok(created)
}
