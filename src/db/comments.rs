//! Comment persistence - Append-only comments on games.

use crate::{
    entities::{Comment, comment},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::instrument;

/// Every comment in posting order.
pub async fn list_comments(db: &DatabaseConnection) -> Result<Vec<comment::Model>> {
    Comment::find()
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Comments for a single game in posting order.
pub async fn comments_for_game(
    db: &DatabaseConnection,
    game_id: i64,
) -> Result<Vec<comment::Model>> {
    Comment::find()
        .filter(comment::Column::GameId.eq(game_id))
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Stores a new comment with zeroed like/dislike counters.
///
/// # Errors
/// Returns [`Error::Validation`] for blank text, or a database error.
#[instrument(skip(db, text))]
pub async fn create_comment(
    db: &DatabaseConnection,
    user_id: i64,
    game_id: i64,
    text: &str,
) -> Result<comment::Model> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("text", "Comment cannot be empty"));
    }
    comment::ActiveModel {
        text: Set(text.to_string()),
        user_id: Set(user_id),
        game_id: Set(game_id),
        likes: Set(0),
        dislikes: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
