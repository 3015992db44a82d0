//! Proposal lifecycle manager.
//!
//! Moderates proposals held in the session: `PENDING -> APPROVED` (creating a game)
//! and `PENDING -> REJECTED`. Transitions out of a terminal state are refused
//! locally before any remote call. Approval always creates the game first and
//! only then moves the proposal to `APPROVED`.
//!
//! The manager assumes its caller holds the admin capability; the session checks it.

use super::session::SessionState;
use crate::{
    entities::{ProposalState, game, proposal},
    errors::{Error, Result},
    gateway::RemoteGateway,
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError, Weak},
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Proposals in `state`, in the order they are held.
#[must_use]
pub fn proposals_in_state(
    proposals: &[proposal::Model],
    state: ProposalState,
) -> Vec<&proposal::Model> {
    proposals.iter().filter(|p| p.state == state).collect()
}

/// Result of a moderation call that passed the local checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Moderation {
    /// The proposal is now `APPROVED` and this game was added to the catalog
    Approved(game::Model),
    /// The proposal is now `REJECTED`
    Rejected,
    /// Another moderation call for this proposal has not finished yet
    InFlight,
    /// The backend answered after the session was closed
    Discarded,
}

/// Approves and rejects proposals for one session.
pub struct ProposalManager<G> {
    gateway: Arc<G>,
    state: Weak<RwLock<SessionState>>,
    pending: Arc<Mutex<HashSet<i64>>>,
}

impl<G> Clone for ProposalManager<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Weak::clone(&self.state),
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Releases a proposal id from the in-flight set when dropped.
struct Claim<'a> {
    pending: &'a Mutex<HashSet<i64>>,
    proposal_id: i64,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.proposal_id);
    }
}

impl<G: RemoteGateway> ProposalManager<G> {
    /// Creates a manager bound to `state` through a weak reference.
    #[must_use]
    pub fn new(gateway: Arc<G>, state: &Arc<RwLock<SessionState>>) -> Self {
        Self {
            gateway,
            state: Arc::downgrade(state),
            pending: Arc::default(),
        }
    }

    fn claim(&self, proposal_id: i64) -> Option<Claim<'_>> {
        let mut set = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        set.insert(proposal_id).then(|| Claim {
            pending: &self.pending,
            proposal_id,
        })
    }

    /// Looks the proposal up in the session and checks that it may move to `to`.
    async fn check_transition(
        &self,
        proposal_id: i64,
        to: ProposalState,
    ) -> Result<Option<proposal::Model>> {
        let Some(state) = self.state.upgrade() else {
            return Ok(None);
        };
        let guard = state.read().await;
        let proposal = guard
            .proposals
            .iter()
            .find(|p| p.id == proposal_id)
            .ok_or(Error::NotFound {
                entity: "proposal",
                id: proposal_id,
            })?;
        if !proposal.state.can_transition_to(to) {
            warn!(
                "Refusing to move proposal {proposal_id} from {} to {to}",
                proposal.state
            );
            return Err(Error::InvalidTransition {
                proposal_id,
                from: proposal.state,
                to,
            });
        }
        Ok(Some(proposal.clone()))
    }

    /// Approves a pending proposal.
    ///
    /// A game created by an earlier attempt whose state update failed is reused,
    /// so one proposal never yields two games.
    ///
    /// # Errors
    /// - [`Error::NotFound`] / [`Error::InvalidTransition`] without any remote call
    /// - The `create_game` failure, with the proposal still `PENDING` and no game added
    /// - The `update_proposal_state` failure. The game was already created and is
    ///   added to the catalog; the proposal stays `PENDING`.
    #[instrument(skip(self))]
    pub async fn approve(&self, proposal_id: i64) -> Result<Moderation> {
        let Some(proposal) = self
            .check_transition(proposal_id, ProposalState::Approved)
            .await?
        else {
            return Ok(Moderation::Discarded);
        };
        let Some(_claim) = self.claim(proposal_id) else {
            return Ok(Moderation::InFlight);
        };

        let Some(state) = self.state.upgrade() else {
            return Ok(Moderation::Discarded);
        };
        let earlier = state.read().await.created_games.get(&proposal_id).cloned();
        drop(state);

        let created = match earlier {
            Some(game) => {
                debug!("Reusing game {} created for proposal {proposal_id}", game.id);
                game
            }
            None => {
                let game = self.gateway.create_game(proposal.draft()).await?;
                if let Some(state) = self.state.upgrade() {
                    let mut guard = state.write().await;
                    guard.created_games.insert(proposal_id, game.clone());
                    if !guard.games.iter().any(|g| g.id == game.id) {
                        guard.games.push(game.clone());
                    }
                }
                game
            }
        };

        let updated = self
            .gateway
            .update_proposal_state(proposal_id, ProposalState::Approved)
            .await;

        let Some(state) = self.state.upgrade() else {
            debug!("Session closed before approval of proposal {proposal_id} completed");
            return updated.map(|_| Moderation::Discarded);
        };
        let updated = updated?;
        let mut guard = state.write().await;
        guard.created_games.remove(&proposal_id);
        guard.replace_proposal(updated);
        info!(
            "Approved proposal {proposal_id} as game '{}' (ID: {})",
            created.title, created.id
        );
        Ok(Moderation::Approved(created))
    }

    /// Rejects a pending proposal. No game is created.
    ///
    /// # Errors
    /// [`Error::NotFound`] / [`Error::InvalidTransition`] without any remote call, or
    /// the `update_proposal_state` failure with the proposal still `PENDING`.
    #[instrument(skip(self))]
    pub async fn reject(&self, proposal_id: i64) -> Result<Moderation> {
        if self
            .check_transition(proposal_id, ProposalState::Rejected)
            .await?
            .is_none()
        {
            return Ok(Moderation::Discarded);
        }
        let Some(_claim) = self.claim(proposal_id) else {
            return Ok(Moderation::InFlight);
        };

        let updated = self
            .gateway
            .update_proposal_state(proposal_id, ProposalState::Rejected)
            .await?;

        let Some(state) = self.state.upgrade() else {
            return Ok(Moderation::Discarded);
        };
        let mut guard = state.write().await;
        guard.created_games.remove(&proposal_id);
        guard.replace_proposal(updated);
        info!("Rejected proposal {proposal_id}");
        Ok(Moderation::Rejected)
    }
}
