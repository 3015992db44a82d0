//! Shared test utilities for the catalog.
//!
//! This module provides helpers for setting up in-memory test databases, building
//! entities with sensible defaults, and a [`FaultyGateway`] that can fail or delay
//! chosen gateway operations.

use crate::{
    db,
    entities::{IdSet, ProposalState, accessibility_tag, comment, game, genre, platform, proposal, user},
    errors::{Error, Result},
    gateway::{DatabaseGateway, RemoteGateway},
    models::{GameDraft, LoginOutcome, NewUser, UserProfile},
};
use sea_orm::DatabaseConnection;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};
use tracing_subscriber::EnvFilter;

/// Password given to every user made by [`create_test_user`].
pub const TEST_PASSWORD: &str = "contrasinal-seguro";

/// Routes `tracing` output to the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A [`DatabaseGateway`] over a fresh in-memory database.
pub async fn setup_test_gateway() -> Result<DatabaseGateway> {
    Ok(DatabaseGateway::new(setup_test_db().await?))
}

/// A [`FaultyGateway`] over a fresh in-memory database, with no faults armed.
pub async fn setup_faulty_gateway() -> Result<FaultyGateway> {
    Ok(FaultyGateway::new(setup_test_gateway().await?))
}

/// Registration form for `name` with a valid email and [`TEST_PASSWORD`].
pub fn test_new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        password: TEST_PASSWORD.to_string(),
        avatar: None,
        preferences: IdSet::new(),
    }
}

/// Registers a user whose password is [`TEST_PASSWORD`].
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    is_admin: bool,
) -> Result<user::Model> {
    db::users::create_user(db, test_new_user(name), is_admin).await
}

/// A draft that passes proposal validation.
///
/// # Defaults
/// * `price`: 10.0, `min_age`: 3
/// * `genres` and `platforms`: `[1]`
/// * no cover image, no accessibility tags
pub fn test_draft(title: &str) -> GameDraft {
    GameDraft {
        title: title.to_string(),
        description: "Un xogo de proba".to_string(),
        price: 10.0,
        min_age: 3,
        developer: "Estudio de Proba".to_string(),
        cover_image: None,
        cover_alt: None,
        genres: IdSet::from([1]),
        platforms: IdSet::from([1]),
        accessibility_tags: IdSet::new(),
    }
}

/// Stores a game with the given catalog-relevant fields.
pub async fn create_test_game(
    db: &DatabaseConnection,
    title: &str,
    price: f64,
    min_age: i32,
    genres: impl Into<IdSet>,
) -> Result<game::Model> {
    let draft = GameDraft {
        price,
        min_age,
        genres: genres.into(),
        ..test_draft(title)
    };
    db::games::create_game(db, draft).await
}

/// An unsaved game for pure catalog tests.
pub fn test_game(
    id: i64,
    title: &str,
    price: f64,
    min_age: i32,
    genres: impl Into<IdSet>,
) -> game::Model {
    game::Model {
        id,
        title: title.to_string(),
        description: String::new(),
        price,
        min_age,
        developer: String::new(),
        cover_image: None,
        cover_alt: None,
        genres: genres.into(),
        platforms: IdSet::new(),
        accessibility_tags: IdSet::new(),
        created_at: chrono::Utc::now(),
    }
}

/// An unsaved comment on `game_id` by user 1.
pub fn test_comment(id: i64, game_id: i64) -> comment::Model {
    comment::Model {
        id,
        text: format!("Comentario {id}"),
        user_id: 1,
        game_id,
        likes: 0,
        dislikes: 0,
        created_at: chrono::Utc::now(),
    }
}

#[derive(Debug, Default)]
struct Faults {
    failing: HashSet<&'static str>,
    delays: HashMap<&'static str, usize>,
    calls: Vec<&'static str>,
}

/// Wraps a [`DatabaseGateway`] to record calls and inject failures.
///
/// Every call yields to the scheduler at least once before reaching the database,
/// so concurrent operations interleave the way they would over a network.
/// Clones share the same fault configuration.
#[derive(Debug, Clone)]
pub struct FaultyGateway {
    inner: DatabaseGateway,
    faults: Arc<Mutex<Faults>>,
}

impl FaultyGateway {
    pub fn new(inner: DatabaseGateway) -> Self {
        Self {
            inner,
            faults: Arc::default(),
        }
    }

    /// The wrapped gateway. Calls made through it are neither recorded nor faulted.
    pub const fn inner(&self) -> &DatabaseGateway {
        &self.inner
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.inner.connection()
    }

    fn faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later `operation` call fail with [`Error::Remote`].
    pub fn fail(&self, operation: &'static str) {
        self.faults().failing.insert(operation);
    }

    /// Undoes [`FaultyGateway::fail`].
    pub fn recover(&self, operation: &'static str) {
        self.faults().failing.remove(operation);
    }

    /// Adds `yields` extra scheduler yields before every `operation` call.
    pub fn delay(&self, operation: &'static str, yields: usize) {
        self.faults().delays.insert(operation, yields);
    }

    /// Operations called so far, in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.faults().calls.clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<()> {
        let (fail, yields) = {
            let mut faults = self.faults();
            faults.calls.push(operation);
            (
                faults.failing.contains(operation),
                faults.delays.get(operation).copied().unwrap_or(0),
            )
        };
        for _ in 0..=yields {
            tokio::task::yield_now().await;
        }
        if fail {
            Err(Error::remote(operation, "injected failure"))
        } else {
            Ok(())
        }
    }
}

impl RemoteGateway for FaultyGateway {
    async fn list_games(&self) -> Result<Vec<game::Model>> {
        self.enter("list_games").await?;
        self.inner.list_games().await
    }

    async fn list_genres(&self) -> Result<Vec<genre::Model>> {
        self.enter("list_genres").await?;
        self.inner.list_genres().await
    }

    async fn list_platforms(&self) -> Result<Vec<platform::Model>> {
        self.enter("list_platforms").await?;
        self.inner.list_platforms().await
    }

    async fn list_accessibility_tags(&self) -> Result<Vec<accessibility_tag::Model>> {
        self.enter("list_accessibility_tags").await?;
        self.inner.list_accessibility_tags().await
    }

    async fn list_comments(&self) -> Result<Vec<comment::Model>> {
        self.enter("list_comments").await?;
        self.inner.list_comments().await
    }

    async fn list_proposals(&self) -> Result<Vec<proposal::Model>> {
        self.enter("list_proposals").await?;
        self.inner.list_proposals().await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserProfile> {
        self.enter("get_user").await?;
        self.inner.get_user(user_id).await
    }

    async fn name_available(&self, name: &str) -> Result<bool> {
        self.enter("name_available").await?;
        self.inner.name_available(name).await
    }

    async fn login(&self, name: &str, password: &str) -> Result<LoginOutcome> {
        self.enter("login").await?;
        self.inner.login(name, password).await
    }

    async fn register(&self, user: NewUser) -> Result<UserProfile> {
        self.enter("register").await?;
        self.inner.register(user).await
    }

    async fn add_favorite(&self, user_id: i64, game_id: i64) -> Result<()> {
        self.enter("add_favorite").await?;
        self.inner.add_favorite(user_id, game_id).await
    }

    async fn remove_favorite(&self, user_id: i64, game_id: i64) -> Result<()> {
        self.enter("remove_favorite").await?;
        self.inner.remove_favorite(user_id, game_id).await
    }

    async fn create_comment(
        &self,
        user_id: i64,
        game_id: i64,
        text: &str,
    ) -> Result<comment::Model> {
        self.enter("create_comment").await?;
        self.inner.create_comment(user_id, game_id, text).await
    }

    async fn create_game(&self, draft: GameDraft) -> Result<game::Model> {
        self.enter("create_game").await?;
        self.inner.create_game(draft).await
    }

    async fn create_proposal(
        &self,
        draft: GameDraft,
        submitted_by: i64,
    ) -> Result<proposal::Model> {
        self.enter("create_proposal").await?;
        self.inner.create_proposal(draft, submitted_by).await
    }

    async fn update_proposal_state(
        &self,
        proposal_id: i64,
        state: ProposalState,
    ) -> Result<proposal::Model> {
        self.enter("update_proposal_state").await?;
        self.inner.update_proposal_state(proposal_id, state).await
    }
}
