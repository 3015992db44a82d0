//! Database configuration for the catalog store.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`, so
//! the schema always matches the Rust structs. Tables are created parents first
//! because `SQLite` connections opened by sqlx enforce foreign keys.

use crate::entities::{
    AccessibilityTag, Comment, Favorite, Game, Genre, Platform, Proposal, User, favorite,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Directory a file-backed `SQLite` URL points into, if any.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Establishes a connection to the database named by [`get_database_url`],
/// creating the directory of a file-backed `SQLite` database first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates every catalog table if it does not exist yet, plus the unique index on
/// (`user_id`, `game_id`) for favorites.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Genre).await?;
    create_table(db, &schema, Platform).await?;
    create_table(db, &schema, AccessibilityTag).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Game).await?;
    create_table(db, &schema, Favorite).await?;
    create_table(db, &schema, Comment).await?;
    create_table(db, &schema, Proposal).await?;

    let favorite_pair = Index::create()
        .name("idx_favorites_user_game")
        .table(Favorite)
        .col(favorite::Column::UserId)
        .col(favorite::Column::GameId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&favorite_pair)).await?;

    info!("Catalog tables ensured.");
    Ok(())
}
