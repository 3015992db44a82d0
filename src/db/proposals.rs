//! Proposal persistence - Submission and moderation state changes.
//!
//! The store enforces the same transition rule as the client: only a pending
//! proposal may change state, and only to approved or rejected.

use crate::{
    core::validation,
    entities::{Proposal, ProposalState, proposal},
    errors::{Error, Result},
    models::GameDraft,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Every proposal in submission order.
pub async fn list_proposals(db: &DatabaseConnection) -> Result<Vec<proposal::Model>> {
    Proposal::find()
        .order_by_asc(proposal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a proposal by id.
pub async fn get_proposal_by_id(
    db: &DatabaseConnection,
    proposal_id: i64,
) -> Result<Option<proposal::Model>> {
    Proposal::find_by_id(proposal_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores a new proposal in the pending state.
///
/// # Errors
/// Returns an error if:
/// - The draft fails [`validation::validate_proposal`]
/// - The database insert operation fails
#[instrument(skip(db, draft), fields(title = %draft.title))]
pub async fn create_proposal(
    db: &DatabaseConnection,
    draft: GameDraft,
    submitted_by: i64,
) -> Result<proposal::Model> {
    validation::validate_proposal(&draft)?;

    let now = chrono::Utc::now();
    let proposal = proposal::ActiveModel {
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
        submitted_by: Set(submitted_by),
        state: Set(ProposalState::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = proposal.insert(db).await?;
    info!("Proposal {} submitted by user {}", created.id, submitted_by);
    Ok(created)
}

/// Moves a pending proposal to `state`.
///
/// # Errors
/// Returns an error if:
/// - The proposal does not exist
/// - The proposal is not pending, or `state` is not a moderation outcome
/// - The database update operation fails
#[instrument(skip(db))]
pub async fn update_proposal_state(
    db: &DatabaseConnection,
    proposal_id: i64,
    state: ProposalState,
) -> Result<proposal::Model> {
    let current = get_proposal_by_id(db, proposal_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "proposal",
            id: proposal_id,
        })?;

    if !current.state.can_transition_to(state) {
        return Err(Error::InvalidTransition {
            proposal_id,
            from: current.state,
            to: state,
        });
    }

    let mut active: proposal::ActiveModel = current.into();
    active.state = Set(state);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;
    info!("Proposal {} is now {}", proposal_id, updated.state);
    Ok(updated)
}
