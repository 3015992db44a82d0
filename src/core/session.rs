//! Session context - The application state one client owns, and its entry points.
//!
//! A [`Session`] holds the loaded collections, the current user, the current view
//! and the pending notifications in one [`SessionState`] behind an async lock. The
//! lock is never held across a gateway call: operations read what they need,
//! release the lock, await the backend and then apply their change to the state as
//! it is at that point.
//!
//! Every error returned from an entry point is also pushed to the notification
//! list, so the UI layer can show it and let the user dismiss it.

use super::{
    catalog::{self, CatalogQuery},
    favorites::{FavoriteCoordinator, ToggleOutcome},
    notifications::{Notification, Notifications},
    proposals::{Moderation, ProposalManager, proposals_in_state},
    taxonomy::{GameDetail, Taxonomy},
    validation,
    view::View,
};
use crate::{
    entities::{ProposalState, accessibility_tag, comment, game, genre, platform, proposal},
    errors::{Error, Result},
    gateway::RemoteGateway,
    identity::{IdentityStore, StoredIdentity},
    models::{GameDraft, NewUser, UserProfile},
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Display name used when a proposal's submitter cannot be looked up.
pub const UNKNOWN_SUBMITTER: &str = "unknown user";

/// Everything a session has loaded or derived.
#[derive(Debug, Default)]
pub struct SessionState {
    pub games: Vec<game::Model>,
    pub genres: Vec<genre::Model>,
    pub platforms: Vec<platform::Model>,
    pub accessibility_tags: Vec<accessibility_tag::Model>,
    pub comments: Vec<comment::Model>,
    pub proposals: Vec<proposal::Model>,
    /// Games created for proposals whose move to `APPROVED` has not been confirmed
    pub created_games: HashMap<i64, game::Model>,
    pub current_user: Option<UserProfile>,
    pub view: View,
    pub notifications: Notifications,
}

impl SessionState {
    /// Replaces the proposal with the same id, or appends it if it is new.
    pub fn replace_proposal(&mut self, updated: proposal::Model) {
        match self.proposals.iter_mut().find(|p| p.id == updated.id) {
            Some(existing) => *existing = updated,
            None => self.proposals.push(updated),
        }
    }

    /// The taxonomy collections as one borrowed join source.
    #[must_use]
    pub fn taxonomy(&self) -> Taxonomy<'_> {
        Taxonomy {
            genres: &self.genres,
            platforms: &self.platforms,
            accessibility_tags: &self.accessibility_tags,
        }
    }
}

/// A proposal together with its submitter's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalSummary {
    pub proposal: proposal::Model,
    pub submitter: String,
}

/// One client session against a [`RemoteGateway`].
pub struct Session<G, S> {
    gateway: Arc<G>,
    identity: S,
    state: Arc<RwLock<SessionState>>,
    favorites: FavoriteCoordinator<G>,
    proposals: ProposalManager<G>,
}

impl<G: RemoteGateway, S: IdentityStore> Session<G, S> {
    /// Creates an empty session. Call [`Session::load`] to fetch data.
    pub fn new(gateway: G, identity: S) -> Self {
        let gateway = Arc::new(gateway);
        let state = Arc::new(RwLock::new(SessionState::default()));
        Self {
            favorites: FavoriteCoordinator::new(Arc::clone(&gateway), &state),
            proposals: ProposalManager::new(Arc::clone(&gateway), &state),
            gateway,
            identity,
            state,
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// A handle on this session's favorite coordinator. It stops applying results
    /// once the session is dropped.
    #[must_use]
    pub fn favorite_coordinator(&self) -> FavoriteCoordinator<G> {
        self.favorites.clone()
    }

    /// A handle on this session's proposal manager.
    #[must_use]
    pub fn proposal_manager(&self) -> ProposalManager<G> {
        self.proposals.clone()
    }

    /// Pushes a notification for `result` if it is an error, then passes it on.
    async fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            warn!("{error}");
            self.state.write().await.notifications.report(error);
        }
        result
    }

    /// Fetches every collection, then restores the persisted user.
    pub async fn load(&self) -> Result<()> {
        self.refresh().await?;
        self.restore().await?;
        Ok(())
    }

    /// Replaces all collections with fresh snapshots from the gateway.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let fetched = tokio::try_join!(
            self.gateway.list_games(),
            self.gateway.list_genres(),
            self.gateway.list_platforms(),
            self.gateway.list_accessibility_tags(),
            self.gateway.list_comments(),
            self.gateway.list_proposals(),
        );
        let (games, genres, platforms, accessibility_tags, comments, proposals) =
            self.report(fetched).await?;

        let mut state = self.state.write().await;
        info!(
            "Loaded {} games, {} comments and {} proposals",
            games.len(),
            comments.len(),
            proposals.len()
        );
        state.games = games;
        state.genres = genres;
        state.platforms = platforms;
        state.accessibility_tags = accessibility_tags;
        state.comments = comments;
        state.proposals = proposals;
        Ok(())
    }

    /// Reloads the proposal collection only.
    pub async fn refresh_proposals(&self) -> Result<()> {
        let proposals = self.report(self.gateway.list_proposals().await).await?;
        self.state.write().await.proposals = proposals;
        Ok(())
    }

    /// Makes the persisted user current again.
    ///
    /// A persisted id whose user no longer exists is forgotten.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<UserProfile>> {
        let Some(stored) = self.report(self.identity.load()).await? else {
            return Ok(None);
        };
        match self.gateway.get_user(stored.user_id).await {
            Ok(user) => {
                debug!("Restored session for user {}", user.id);
                self.state.write().await.current_user = Some(user.clone());
                Ok(Some(user))
            }
            Err(Error::NotFound { .. }) => {
                warn!("Persisted user {} no longer exists", stored.user_id);
                self.report(self.identity.clear()).await?;
                Ok(None)
            }
            Err(e) => self.report(Err(e)).await,
        }
    }

    /// Logs in and persists the identity.
    #[instrument(skip(self, password))]
    pub async fn login(&self, name: &str, password: &str) -> Result<UserProfile> {
        let outcome = self.report(self.gateway.login(name, password).await).await?;
        let stored = StoredIdentity {
            user_id: outcome.user.id,
            tokens: outcome.tokens,
        };
        self.report(self.identity.save(&stored)).await?;

        let mut state = self.state.write().await;
        state.current_user = Some(outcome.user.clone());
        state.view = state.view.after_login();
        info!("User '{}' logged in", outcome.user.name);
        Ok(outcome.user)
    }

    /// Forgets the current user here and in the identity store.
    pub async fn logout(&self) -> Result<()> {
        self.report(self.identity.clear()).await?;
        let mut state = self.state.write().await;
        if let Some(user) = state.current_user.take() {
            info!("User '{}' logged out", user.name);
        }
        state.view = state.view.after_logout();
        Ok(())
    }

    /// Creates an account. The new user still has to log in.
    pub async fn register(&self, user: NewUser) -> Result<UserProfile> {
        self.report(validation::validate_registration(&user)).await?;
        self.report(self.gateway.register(user).await).await
    }

    /// Whether `name` is still free for registration.
    pub async fn name_available(&self, name: &str) -> Result<bool> {
        self.report(self.gateway.name_available(name).await).await
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.read().await.current_user.clone()
    }

    /// The filtered and sorted catalog for the current favorites and comments.
    pub async fn catalog(&self, query: &CatalogQuery) -> Vec<game::Model> {
        let state = self.state.read().await;
        let favorites = state
            .current_user
            .as_ref()
            .map(|u| u.favorites.clone())
            .unwrap_or_default();
        catalog::catalog_view(&state.games, query, &favorites, &state.comments)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The current user's favorite games; empty when nobody is logged in.
    pub async fn favorite_games(&self) -> Vec<game::Model> {
        let state = self.state.read().await;
        state
            .current_user
            .as_ref()
            .map(|user| {
                catalog::favorite_games(&state.games, &user.favorites)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn is_favorite(&self, game_id: i64) -> bool {
        self.favorites.is_favorite(game_id).await
    }

    /// See [`FavoriteCoordinator::toggle`].
    pub async fn toggle_favorite(&self, game_id: i64) -> Result<ToggleOutcome> {
        let outcome = self.favorites.toggle(game_id).await;
        self.report(outcome).await
    }

    /// A game with its taxonomy names and comments.
    pub async fn game_detail(&self, game_id: i64) -> Option<GameDetail> {
        let state = self.state.read().await;
        let game = state.games.iter().find(|g| g.id == game_id)?;
        Some(state.taxonomy().detail(game, &state.comments))
    }

    /// Comments on one game, oldest first.
    pub async fn comments_for_game(&self, game_id: i64) -> Vec<comment::Model> {
        let state = self.state.read().await;
        state
            .comments
            .iter()
            .filter(|c| c.game_id == game_id)
            .cloned()
            .collect()
    }

    /// Posts a comment as the current user. Returns `None` when nobody is logged in.
    #[instrument(skip(self, text))]
    pub async fn submit_comment(&self, game_id: i64, text: &str) -> Result<Option<comment::Model>> {
        let Some(user_id) = self.current_user_id().await else {
            debug!("No current user; ignoring comment");
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return self
                .report(Err(Error::validation("text", "Comment cannot be empty")))
                .await;
        }

        let created = self
            .report(self.gateway.create_comment(user_id, game_id, text).await)
            .await?;
        self.state.write().await.comments.push(created.clone());
        Ok(Some(created))
    }

    /// Submits a game proposal as the current user. Returns `None` when nobody is
    /// logged in. HTML tags are removed from the description first.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn submit_proposal(&self, mut draft: GameDraft) -> Result<Option<proposal::Model>> {
        let Some(user_id) = self.current_user_id().await else {
            debug!("No current user; ignoring proposal");
            return Ok(None);
        };
        draft.description = validation::strip_tags(&draft.description);
        self.report(validation::validate_proposal(&draft)).await?;

        let created = self
            .report(self.gateway.create_proposal(draft, user_id).await)
            .await?;
        self.state.write().await.replace_proposal(created.clone());
        info!("Submitted proposal '{}' (ID: {})", created.title, created.id);
        Ok(Some(created))
    }

    /// Proposals in `state` with submitter names resolved.
    pub async fn proposals(&self, state: ProposalState) -> Vec<ProposalSummary> {
        let (selected, current) = {
            let guard = self.state.read().await;
            let selected: Vec<proposal::Model> = proposals_in_state(&guard.proposals, state)
                .into_iter()
                .cloned()
                .collect();
            (selected, guard.current_user.clone())
        };

        let mut names: HashMap<i64, String> = HashMap::new();
        if let Some(user) = current {
            names.insert(user.id, user.name);
        }
        let mut summaries = Vec::with_capacity(selected.len());
        for proposal in selected {
            let submitter = match names.get(&proposal.submitted_by) {
                Some(name) => name.clone(),
                None => {
                    let name = match self.gateway.get_user(proposal.submitted_by).await {
                        Ok(user) => user.name,
                        Err(e) => {
                            debug!("Could not resolve submitter {}: {e}", proposal.submitted_by);
                            UNKNOWN_SUBMITTER.to_string()
                        }
                    };
                    names.insert(proposal.submitted_by, name.clone());
                    name
                }
            };
            summaries.push(ProposalSummary {
                proposal,
                submitter,
            });
        }
        summaries
    }

    /// Approves a proposal. Requires an administrator.
    pub async fn approve(&self, proposal_id: i64) -> Result<Moderation> {
        self.report(self.require_admin("approve proposal").await)
            .await?;
        let outcome = self.proposals.approve(proposal_id).await;
        self.report(outcome).await
    }

    /// Rejects a proposal. Requires an administrator.
    pub async fn reject(&self, proposal_id: i64) -> Result<Moderation> {
        self.report(self.require_admin("reject proposal").await)
            .await?;
        let outcome = self.proposals.reject(proposal_id).await;
        self.report(outcome).await
    }

    async fn require_admin(&self, action: &'static str) -> Result<()> {
        let state = self.state.read().await;
        match state.current_user.as_ref() {
            Some(user) if user.is_admin => Ok(()),
            _ => Err(Error::PermissionDenied { action }),
        }
    }

    async fn current_user_id(&self) -> Option<i64> {
        self.state.read().await.current_user.as_ref().map(|u| u.id)
    }

    /// Moves to `target`, or to [`View::Login`] if it needs a user. Returns the
    /// view now shown.
    pub async fn navigate(&self, target: View) -> View {
        let mut state = self.state.write().await;
        state.view = View::navigate(target, state.current_user.is_some());
        debug!("Now showing {}", state.view);
        state.view
    }

    pub async fn view(&self) -> View {
        self.state.read().await.view
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.list().to_vec()
    }

    /// Dismisses a notification. Returns false if it was already gone.
    pub async fn dismiss(&self, id: u64) -> bool {
        self.state.write().await.notifications.dismiss(id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::{
        core::{
            catalog::{CatalogFilter, SortOrder},
            notifications::NotificationKind,
        },
        entities::IdSet,
        identity::MemoryIdentityStore,
        test_utils::*,
    };

    type TestSession = Session<FaultyGateway, MemoryIdentityStore>;

    async fn setup_session() -> Result<(TestSession, FaultyGateway)> {
        let gateway = setup_faulty_gateway().await?;
        let session = Session::new(gateway.clone(), MemoryIdentityStore::default());
        Ok((session, gateway))
    }

    #[tokio::test]
    async fn test_load_restores_persisted_user() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let db = gateway.connection();
        let user = create_test_user(db, "Breixo", false).await?;
        let game = create_test_game(db, "Aventura", 10.0, 3, [1]).await?;
        gateway.inner().add_favorite(user.id, game.id).await?;
        session.identity.save(&StoredIdentity {
            user_id: user.id,
            tokens: None,
        })?;

        session.load().await?;
        let current = session.current_user().await.unwrap();
        assert_eq!(current.id, user.id);
        assert!(session.is_favorite(game.id).await);
        assert_eq!(session.catalog(&CatalogQuery::default()).await, vec![game]);
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_forgets_deleted_user() -> Result<()> {
        let (session, _) = setup_session().await?;
        session.identity.save(&StoredIdentity {
            user_id: 404,
            tokens: None,
        })?;

        assert_eq!(session.restore().await?, None);
        assert_eq!(session.identity.load()?, None);
        assert!(session.notifications().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_load_is_notified() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        gateway.fail("list_comments");

        let err = session.load().await.unwrap_err();
        assert!(err.is_remote());
        let notifications = session.notifications().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::RemoteFailure);

        assert!(session.dismiss(notifications[0].id).await);
        assert!(session.notifications().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_login_logout_and_views() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let user = create_test_user(gateway.connection(), "Noa", false).await?;

        assert_eq!(session.navigate(View::Favorites).await, View::Login);
        let refused = session.login("Noa", "not-the-password").await;
        assert!(matches!(refused, Err(Error::Authentication { .. })));
        assert_eq!(session.notifications().await.len(), 1);

        let profile = session.login("Noa", TEST_PASSWORD).await?;
        assert_eq!(profile.id, user.id);
        assert_eq!(session.view().await, View::Home);
        let stored = session.identity.load()?.unwrap();
        assert_eq!(stored.user_id, user.id);
        assert!(stored.tokens.is_some());
        assert_eq!(session.navigate(View::Proposals).await, View::Proposals);

        session.logout().await?;
        assert_eq!(session.current_user().await, None);
        assert_eq!(session.identity.load()?, None);
        assert_eq!(session.view().await, View::Home);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_validates_before_remote_call() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let mut user = test_new_user("Tareixa");
        user.password = "short".to_string();

        let result = session.register(user).await;
        assert!(matches!(result, Err(Error::Validation { field: "password", .. })));
        assert!(gateway.calls().is_empty());

        assert!(session.name_available("Tareixa").await?);
        let profile = session.register(test_new_user("Tareixa")).await?;
        assert_eq!(profile.name, "Tareixa");
        assert!(!session.name_available("Tareixa").await?);
        assert_eq!(session.current_user().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_failure_is_notified_and_state_kept() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        create_test_user(gateway.connection(), "Xiana", false).await?;
        create_test_game(gateway.connection(), "Aventura", 10.0, 3, [1]).await?;
        session.load().await?;
        assert_eq!(session.toggle_favorite(1).await?, ToggleOutcome::NoUser);
        assert!(gateway.calls().iter().all(|c| *c != "add_favorite"));

        session.login("Xiana", TEST_PASSWORD).await?;
        gateway.fail("add_favorite");
        assert!(session.toggle_favorite(1).await.is_err());
        assert!(!session.is_favorite(1).await);
        assert_eq!(
            session.notifications().await[0].kind,
            NotificationKind::RemoteFailure
        );

        gateway.recover("add_favorite");
        assert_eq!(session.toggle_favorite(1).await?, ToggleOutcome::Added);
        assert_eq!(session.favorite_games().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_view_uses_favorites_and_comments() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let db = gateway.connection();
        create_test_user(db, "Brais", false).await?;
        let a = create_test_game(db, "Aventura", 10.0, 3, [1]).await?;
        let b = create_test_game(db, "Batalla", 30.0, 18, [2]).await?;
        session.load().await?;
        session.login("Brais", TEST_PASSWORD).await?;

        session.toggle_favorite(b.id).await?;
        let query = CatalogQuery {
            filter: CatalogFilter::default(),
            sort: Some(SortOrder::FavoritesFirst),
        };
        let ids: Vec<_> = session.catalog(&query).await.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);

        session.submit_comment(a.id, "Moi accesible").await?;
        let query = CatalogQuery {
            filter: CatalogFilter::default(),
            sort: Some(SortOrder::MostCommented),
        };
        let ids: Vec<_> = session.catalog(&query).await.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_comment() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        create_test_user(gateway.connection(), "Icía", false).await?;
        let game = create_test_game(gateway.connection(), "Aventura", 10.0, 3, [1]).await?;
        session.load().await?;

        assert_eq!(session.submit_comment(game.id, "Ola").await?, None);
        assert!(gateway.calls().iter().all(|c| *c != "create_comment"));

        session.login("Icía", TEST_PASSWORD).await?;
        let blank = session.submit_comment(game.id, "   ").await;
        assert!(matches!(blank, Err(Error::Validation { field: "text", .. })));

        let created = session.submit_comment(game.id, "  Moi bo  ").await?.unwrap();
        assert_eq!(created.text, "Moi bo");
        assert_eq!((created.likes, created.dislikes), (0, 0));
        assert_eq!(session.comments_for_game(game.id).await, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_proposal_strips_tags_and_validates() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        create_test_user(gateway.connection(), "Anxo", false).await?;
        assert_eq!(session.submit_proposal(test_draft("X")).await?, None);

        session.login("Anxo", TEST_PASSWORD).await?;
        let mut draft = test_draft("X");
        draft.description = "<b>Xogo</b> de <i>aventuras</i>".to_string();
        let created = session.submit_proposal(draft).await?.unwrap();
        assert_eq!(created.description, "Xogo de aventuras");
        assert_eq!(created.state, ProposalState::Pending);

        let mut invalid = test_draft("Y");
        invalid.platforms = IdSet::new();
        let result = session.submit_proposal(invalid).await;
        assert!(matches!(result, Err(Error::Validation { field: "platforms", .. })));

        let pending = session.proposals(ProposalState::Pending).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].submitter, "Anxo");
        Ok(())
    }

    #[tokio::test]
    async fn test_moderation_requires_admin() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let db = gateway.connection();
        let author = create_test_user(db, "Rut", false).await?;
        create_test_user(db, "Admin", true).await?;
        let proposal = gateway.inner().create_proposal(test_draft("X"), author.id).await?;
        session.load().await?;

        let denied = session.approve(proposal.id).await;
        assert!(matches!(denied, Err(Error::PermissionDenied { .. })));
        session.login("Rut", TEST_PASSWORD).await?;
        assert!(matches!(
            session.reject(proposal.id).await,
            Err(Error::PermissionDenied { .. })
        ));
        assert!(gateway.calls().iter().all(|c| *c != "update_proposal_state"));

        session.login("Admin", TEST_PASSWORD).await?;
        let Moderation::Approved(game) = session.approve(proposal.id).await? else {
            panic!("expected approval");
        };
        assert_eq!(game.title, "X");
        assert!(session.catalog(&CatalogQuery::default()).await.contains(&game));
        assert!(session.proposals(ProposalState::Pending).await.is_empty());

        let approved = session.proposals(ProposalState::Approved).await;
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].submitter, "Rut");

        let refused = session.approve(proposal.id).await.unwrap_err();
        assert!(matches!(refused, Error::InvalidTransition { .. }));
        let kinds: Vec<_> = session.notifications().await.iter().map(|n| n.kind).collect();
        assert!(kinds.iter().all(|k| *k == NotificationKind::Refused));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_submitter_falls_back() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let author = create_test_user(gateway.connection(), "Lúa", false).await?;
        gateway.inner().create_proposal(test_draft("X"), author.id).await?;
        session.load().await?;
        gateway.fail("get_user");

        let pending = session.proposals(ProposalState::Pending).await;
        assert_eq!(pending[0].submitter, UNKNOWN_SUBMITTER);
        assert!(session.notifications().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_game_detail_resolves_names() -> Result<()> {
        let (session, gateway) = setup_session().await?;
        let db = gateway.connection();
        let genre = crate::db::taxonomy::create_genre(db, "Aventura").await?;
        let game = create_test_game(db, "Xogo", 5.0, 6, [genre.id, 999]).await?;
        session.load().await?;

        let detail = session.game_detail(game.id).await.unwrap();
        assert_eq!(detail.genres, vec!["Aventura".to_string()]);
        assert!(session.game_detail(12345).await.is_none());
        Ok(())
    }
}
