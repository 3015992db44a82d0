//! Client-side catalog core.
//!
//! Framework-agnostic logic that sits between the UI layer and the
//! [`RemoteGateway`](crate::gateway::RemoteGateway): the filter/sort engine, the
//! favorite toggle coordinator, the proposal lifecycle manager and the session that
//! owns their shared state.

pub mod catalog;
pub mod favorites;
pub mod notifications;
pub mod proposals;
pub mod session;
pub mod taxonomy;
pub mod validation;
pub mod view;

pub use catalog::{CatalogFilter, CatalogQuery, SortOrder};
pub use favorites::{FavoriteCoordinator, ToggleOutcome};
pub use proposals::{Moderation, ProposalManager};
pub use session::{ProposalSummary, Session, SessionState};
pub use view::View;
