//! Seeds reference data, starting games and the administrator from config.toml.
//!
//! Seeding is idempotent: taxonomy entries are matched by name, games are only
//! inserted into an empty catalog and the administrator only when the name is free.

use crate::{
    config::catalog::{CatalogConfig, GameConfig},
    db::{games, taxonomy, users},
    entities::IdSet,
    errors::Result,
    models::{GameDraft, NewUser},
};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub genres: usize,
    pub platforms: usize,
    pub accessibility_tags: usize,
    pub games: usize,
    pub admin_created: bool,
}

fn resolve_names(kind: &str, names: &[String], ids: &HashMap<String, i64>) -> IdSet {
    names
        .iter()
        .filter_map(|name| {
            let id = ids.get(name.trim()).copied();
            if id.is_none() {
                warn!("Seed game references unknown {kind} '{name}'. Skipping it.");
            }
            id
        })
        .collect()
}

fn draft_from_config(
    game: &GameConfig,
    genres: &HashMap<String, i64>,
    platforms: &HashMap<String, i64>,
    tags: &HashMap<String, i64>,
) -> GameDraft {
    GameDraft {
        title: game.title.clone(),
        description: game.description.clone(),
        price: game.price,
        min_age: game.min_age,
        developer: game.developer.clone(),
        cover_image: game.cover_image.clone(),
        cover_alt: None,
        genres: resolve_names("genre", &game.genres, genres),
        platforms: resolve_names("platform", &game.platforms, platforms),
        accessibility_tags: resolve_names("accessibility tag", &game.accessibility_tags, tags),
    }
}

/// Writes the configured catalog into the database.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut genre_ids: HashMap<String, i64> = taxonomy::list_genres(db)
        .await?
        .into_iter()
        .map(|g| (g.name, g.id))
        .collect();
    for name in &config.genres {
        if !genre_ids.contains_key(name.trim()) {
            let created = taxonomy::create_genre(db, name).await?;
            genre_ids.insert(created.name, created.id);
            summary.genres += 1;
        }
    }

    let mut platform_ids: HashMap<String, i64> = taxonomy::list_platforms(db)
        .await?
        .into_iter()
        .map(|p| (p.name, p.id))
        .collect();
    for name in &config.platforms {
        if !platform_ids.contains_key(name.trim()) {
            let created = taxonomy::create_platform(db, name).await?;
            platform_ids.insert(created.name, created.id);
            summary.platforms += 1;
        }
    }

    let mut tag_ids: HashMap<String, i64> = taxonomy::list_accessibility_tags(db)
        .await?
        .into_iter()
        .map(|t| (t.name, t.id))
        .collect();
    for tag in &config.accessibility_tags {
        if !tag_ids.contains_key(tag.name.trim()) {
            let created = taxonomy::create_accessibility_tag(db, &tag.name, &tag.description).await?;
            tag_ids.insert(created.name, created.id);
            summary.accessibility_tags += 1;
        }
    }

    if games::list_games(db).await?.is_empty() {
        for game in &config.games {
            let draft = draft_from_config(game, &genre_ids, &platform_ids, &tag_ids);
            games::create_game(db, draft).await?;
            summary.games += 1;
        }
    } else if !config.games.is_empty() {
        info!("Catalog already has games. Skipping configured games.");
    }

    if let Some(admin) = &config.admin {
        if users::find_user_by_name(db, &admin.name).await?.is_none() {
            let new_user = NewUser {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                avatar: None,
                preferences: IdSet::new(),
            };
            users::create_user(db, new_user, true).await?;
            summary.admin_created = true;
        }
    }

    info!("Seeding finished: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const CONFIG: &str = r#"
        genres = ["Aventura", "Loita"]
        platforms = ["PC"]

        [[accessibility_tags]]
        name = "Subtítulos"

        [[games]]
        title = "Aventura"
        price = 10.0
        min_age = 3
        developer = "Estudio"
        genres = ["Aventura", "Descoñecido"]
        platforms = ["PC"]
        accessibility_tags = ["Subtítulos"]

        [admin]
        name = "admin"
        email = "admin@example.org"
        password = "administrador"
    "#;

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: CatalogConfig = toml::from_str(CONFIG).unwrap();

        let first = seed_catalog(&db, &config).await?;
        assert_eq!(
            first,
            SeedSummary {
                genres: 2,
                platforms: 1,
                accessibility_tags: 1,
                games: 1,
                admin_created: true,
            }
        );

        let second = seed_catalog(&db, &config).await?;
        assert_eq!(second, SeedSummary::default());

        let games = games::list_games(&db).await?;
        assert_eq!(games.len(), 1);
        // The unknown genre name is dropped, the known one resolved.
        assert_eq!(games[0].genres.len(), 1);

        let admin = users::find_user_by_name(&db, "admin").await?.unwrap();
        assert!(admin.is_admin);
        Ok(())
    }
}
