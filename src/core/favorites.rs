//! Favorite toggle coordinator.
//!
//! The coordinator is the only writer of the current user's favorites set. A toggle
//! reads membership, awaits the remote add/remove, and only then mutates the set.
//! The mutation is applied to whatever the set holds at that moment, so two toggles
//! for different games that overlap in time are both kept.

use super::session::SessionState;
use crate::{errors::Result, gateway::RemoteGateway};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError, Weak},
};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// What a call to [`FavoriteCoordinator::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The game was confirmed as a favorite
    Added,
    /// The game was confirmed as no longer a favorite
    Removed,
    /// Nobody is logged in; nothing was sent
    NoUser,
    /// A toggle for this game is already waiting on the backend; nothing was sent
    InFlight,
    /// The backend answered after the session was closed or the user changed
    Discarded,
}

/// Releases a game id from the in-flight set when dropped.
struct InFlight<'a> {
    pending: &'a Mutex<HashSet<i64>>,
    game_id: i64,
}

impl<'a> InFlight<'a> {
    fn claim(pending: &'a Mutex<HashSet<i64>>, game_id: i64) -> Option<Self> {
        let mut set = pending.lock().unwrap_or_else(PoisonError::into_inner);
        set.insert(game_id).then(|| Self { pending, game_id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.game_id);
    }
}

/// Toggles favorites for the current user of one session.
pub struct FavoriteCoordinator<G> {
    gateway: Arc<G>,
    state: Weak<RwLock<SessionState>>,
    pending: Arc<Mutex<HashSet<i64>>>,
}

impl<G> Clone for FavoriteCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Weak::clone(&self.state),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<G: RemoteGateway> FavoriteCoordinator<G> {
    /// Creates a coordinator bound to `state`. It holds only a weak reference, so
    /// closing the session stops later responses from being applied.
    #[must_use]
    pub fn new(gateway: Arc<G>, state: &Arc<RwLock<SessionState>>) -> Self {
        Self {
            gateway,
            state: Arc::downgrade(state),
            pending: Arc::default(),
        }
    }

    /// Whether `game_id` is in the current user's favorites.
    pub async fn is_favorite(&self, game_id: i64) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let guard = state.read().await;
        guard
            .current_user
            .as_ref()
            .is_some_and(|user| user.favorites.contains(game_id))
    }

    /// Flips the favorite status of `game_id` for the current user.
    ///
    /// # Errors
    /// Returns the gateway error if the add/remove call fails. The local set is
    /// left as it was.
    #[instrument(skip(self))]
    pub async fn toggle(&self, game_id: i64) -> Result<ToggleOutcome> {
        let Some(state) = self.state.upgrade() else {
            return Ok(ToggleOutcome::Discarded);
        };
        let (user_id, was_favorite) = {
            let guard = state.read().await;
            let Some(user) = guard.current_user.as_ref() else {
                debug!("No current user; ignoring favorite toggle");
                return Ok(ToggleOutcome::NoUser);
            };
            (user.id, user.favorites.contains(game_id))
        };
        drop(state);

        let Some(_claim) = InFlight::claim(&self.pending, game_id) else {
            debug!("Toggle for game {game_id} already in flight");
            return Ok(ToggleOutcome::InFlight);
        };

        if was_favorite {
            self.gateway.remove_favorite(user_id, game_id).await?;
        } else {
            self.gateway.add_favorite(user_id, game_id).await?;
        }

        let Some(state) = self.state.upgrade() else {
            debug!("Session closed before favorite toggle for game {game_id} completed");
            return Ok(ToggleOutcome::Discarded);
        };
        let mut guard = state.write().await;
        match guard.current_user.as_mut() {
            Some(user) if user.id == user_id => {
                if was_favorite {
                    user.favorites.remove(game_id);
                    Ok(ToggleOutcome::Removed)
                } else {
                    user.favorites.insert(game_id);
                    Ok(ToggleOutcome::Added)
                }
            }
            _ => {
                debug!("Current user changed while toggling game {game_id}");
                Ok(ToggleOutcome::Discarded)
            }
        }
    }
}
