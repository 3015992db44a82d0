//! Remote Data Gateway - Everything the client core needs from the backend.
//!
//! The core is written against [`RemoteGateway`] and never touches storage itself.
//! Every method is a suspension point; callers must not assume responses arrive in
//! the order requests were issued. [`DatabaseGateway`] is the bundled
//! implementation, backed by the `SeaORM` store in [`crate::db`].
//!
//! Error contract: storage failures surface as [`Error::Remote`]. Refusals the
//! backend makes on purpose keep their own variants (`NotFound`, `Authentication`,
//! `DuplicateName`, `Validation`, `InvalidTransition`).

use crate::{
    db,
    entities::{ProposalState, accessibility_tag, comment, game, genre, platform, proposal},
    errors::{Error, Result},
    models::{AuthTokens, GameDraft, LoginOutcome, NewUser, UserProfile},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Backend operations consumed by the catalog core.
#[allow(async_fn_in_trait)]
pub trait RemoteGateway {
    /// Snapshot of every game.
    async fn list_games(&self) -> Result<Vec<game::Model>>;
    /// Snapshot of every genre.
    async fn list_genres(&self) -> Result<Vec<genre::Model>>;
    /// Snapshot of every platform.
    async fn list_platforms(&self) -> Result<Vec<platform::Model>>;
    /// Snapshot of every accessibility tag.
    async fn list_accessibility_tags(&self) -> Result<Vec<accessibility_tag::Model>>;
    /// Snapshot of every comment.
    async fn list_comments(&self) -> Result<Vec<comment::Model>>;
    /// Snapshot of every proposal, whatever its state.
    async fn list_proposals(&self) -> Result<Vec<proposal::Model>>;
    /// A user with favorites, or [`Error::NotFound`].
    async fn get_user(&self, user_id: i64) -> Result<UserProfile>;
    /// Whether no account uses `name` yet.
    async fn name_available(&self, name: &str) -> Result<bool>;
    /// Checks credentials, or [`Error::Authentication`].
    async fn login(&self, name: &str, password: &str) -> Result<LoginOutcome>;
    /// Creates an account, or [`Error::DuplicateName`] / [`Error::Validation`].
    async fn register(&self, user: NewUser) -> Result<UserProfile>;
    /// Marks `game_id` as a favorite of `user_id`.
    async fn add_favorite(&self, user_id: i64, game_id: i64) -> Result<()>;
    /// Removes the (`user_id`, `game_id`) favorite.
    async fn remove_favorite(&self, user_id: i64, game_id: i64) -> Result<()>;
    /// Posts a comment and returns the stored record.
    async fn create_comment(&self, user_id: i64, game_id: i64, text: &str)
    -> Result<comment::Model>;
    /// Creates a game and returns it with its assigned id.
    async fn create_game(&self, draft: GameDraft) -> Result<game::Model>;
    /// Stores a proposal in the pending state.
    async fn create_proposal(&self, draft: GameDraft, submitted_by: i64)
    -> Result<proposal::Model>;
    /// Moves a proposal to `state` and returns the updated record.
    async fn update_proposal_state(
        &self,
        proposal_id: i64,
        state: ProposalState,
    ) -> Result<proposal::Model>;
}

/// Converts storage failures into gateway failures, leaving deliberate refusals alone.
fn remote(operation: &'static str) -> impl FnOnce(Error) -> Error {
    move |error| match error {
        Error::Database(db_err) => Error::remote(operation, db_err),
        Error::Io(io_err) => Error::remote(operation, io_err),
        other => other,
    }
}

/// [`RemoteGateway`] over a `SeaORM` connection.
///
/// Clones share one connection, and so one store.
#[derive(Debug, Clone)]
pub struct DatabaseGateway {
    db: Arc<DatabaseConnection>,
}

impl DatabaseGateway {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    /// The underlying connection, for seeding and tests.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RemoteGateway for DatabaseGateway {
    async fn list_games(&self) -> Result<Vec<game::Model>> {
        db::games::list_games(&self.db)
            .await
            .map_err(remote("list_games"))
    }

    async fn list_genres(&self) -> Result<Vec<genre::Model>> {
        db::taxonomy::list_genres(&self.db)
            .await
            .map_err(remote("list_genres"))
    }

    async fn list_platforms(&self) -> Result<Vec<platform::Model>> {
        db::taxonomy::list_platforms(&self.db)
            .await
            .map_err(remote("list_platforms"))
    }

    async fn list_accessibility_tags(&self) -> Result<Vec<accessibility_tag::Model>> {
        db::taxonomy::list_accessibility_tags(&self.db)
            .await
            .map_err(remote("list_accessibility_tags"))
    }

    async fn list_comments(&self) -> Result<Vec<comment::Model>> {
        db::comments::list_comments(&self.db)
            .await
            .map_err(remote("list_comments"))
    }

    async fn list_proposals(&self) -> Result<Vec<proposal::Model>> {
        db::proposals::list_proposals(&self.db)
            .await
            .map_err(remote("list_proposals"))
    }

    async fn get_user(&self, user_id: i64) -> Result<UserProfile> {
        db::users::get_user_profile(&self.db, user_id)
            .await
            .map_err(remote("get_user"))
    }

    async fn name_available(&self, name: &str) -> Result<bool> {
        db::users::find_user_by_name(&self.db, name)
            .await
            .map(|found| found.is_none())
            .map_err(remote("name_available"))
    }

    #[instrument(skip(self, password))]
    async fn login(&self, name: &str, password: &str) -> Result<LoginOutcome> {
        let user = db::users::verify_credentials(&self.db, name, password)
            .await
            .map_err(remote("login"))?;
        let favorites = db::favorites::favorites_for_user(&self.db, user.id)
            .await
            .map_err(remote("login"))?;
        let tokens = AuthTokens {
            access: uuid::Uuid::new_v4().to_string(),
            refresh: uuid::Uuid::new_v4().to_string(),
        };
        debug!("Issued tokens for user {}", user.id);
        Ok(LoginOutcome {
            user: UserProfile::from_model(user, favorites),
            tokens: Some(tokens),
        })
    }

    async fn register(&self, user: NewUser) -> Result<UserProfile> {
        let created = db::users::create_user(&self.db, user, false)
            .await
            .map_err(remote("register"))?;
        Ok(UserProfile::from_model(created, crate::entities::IdSet::new()))
    }

    async fn add_favorite(&self, user_id: i64, game_id: i64) -> Result<()> {
        db::favorites::add_favorite(&self.db, user_id, game_id)
            .await
            .map_err(remote("add_favorite"))
    }

    async fn remove_favorite(&self, user_id: i64, game_id: i64) -> Result<()> {
        db::favorites::remove_favorite(&self.db, user_id, game_id)
            .await
            .map_err(remote("remove_favorite"))
    }

    async fn create_comment(
        &self,
        user_id: i64,
        game_id: i64,
        text: &str,
    ) -> Result<comment::Model> {
        db::comments::create_comment(&self.db, user_id, game_id, text)
            .await
            .map_err(remote("create_comment"))
    }

    async fn create_game(&self, draft: GameDraft) -> Result<game::Model> {
        db::games::create_game(&self.db, draft)
            .await
            .map_err(remote("create_game"))
    }

    async fn create_proposal(
        &self,
        draft: GameDraft,
        submitted_by: i64,
    ) -> Result<proposal::Model> {
        db::proposals::create_proposal(&self.db, draft, submitted_by)
            .await
            .map_err(remote("create_proposal"))
    }

    async fn update_proposal_state(
        &self,
        proposal_id: i64,
        state: ProposalState,
    ) -> Result<proposal::Model> {
        db::proposals::update_proposal_state(&self.db, proposal_id, state)
            .await
            .map_err(remote("update_proposal_state"))
    }
}
