//! Favorite persistence - One row per (user, game) marking.
//!
//! Adding an existing favorite and removing a missing one are both successful
//! no-ops, so a retried request cannot fail on a change that already happened.

use crate::{
    entities::{Favorite, IdSet, favorite},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// Game ids the user has marked.
pub async fn favorites_for_user(db: &DatabaseConnection, user_id: i64) -> Result<IdSet> {
    let rows = Favorite::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.game_id).collect())
}

/// Marks `game_id` as a favorite of `user_id`.
#[instrument(skip(db))]
pub async fn add_favorite(db: &DatabaseConnection, user_id: i64, game_id: i64) -> Result<()> {
    let existing = Favorite::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::GameId.eq(game_id))
        .one(db)
        .await?;
    if existing.is_some() {
        debug!("Favorite already present");
        return Ok(());
    }

    favorite::ActiveModel {
        user_id: Set(user_id),
        game_id: Set(game_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Removes the (`user_id`, `game_id`) favorite if present.
#[instrument(skip(db))]
pub async fn remove_favorite(db: &DatabaseConnection, user_id: i64, game_id: i64) -> Result<()> {
    let result = Favorite::delete_many()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::GameId.eq(game_id))
        .exec(db)
        .await?;
    debug!("Removed {} favorite rows", result.rows_affected);
    Ok(())
}
