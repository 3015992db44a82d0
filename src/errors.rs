//! Unified error types for the catalog.
//!
//! Every fallible operation in the crate returns [`Result`]. Gateway failures are
//! reported as [`Error::Remote`] so callers can tell a transient failure apart from
//! a refused operation such as [`Error::InvalidTransition`].

use crate::entities::ProposalState;
use thiserror::Error;

/// All errors produced by the catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw database failure (only surfaces outside the gateway, e.g. during setup)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A Remote Data Gateway call failed
    #[error("Remote call '{operation}' failed: {message}")]
    Remote {
        /// Gateway operation name (e.g. `add_favorite`)
        operation: &'static str,
        /// Underlying failure description
        message: String,
    },

    /// The requested record does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind (e.g. "proposal")
        entity: &'static str,
        /// Missing identifier
        id: i64,
    },

    /// A proposal transition that the lifecycle does not allow
    #[error("Proposal {proposal_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Proposal being moderated
        proposal_id: i64,
        /// State the proposal is currently in
        from: ProposalState,
        /// State that was requested
        to: ProposalState,
    },

    /// Input rejected before any remote call
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Login failed
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Reason shown to the user
        message: String,
    },

    /// Registration with a display name that is already taken
    #[error("The name '{name}' is already in use")]
    DuplicateName {
        /// Requested display name
        name: String,
    },

    /// The current user lacks the capability for this action
    #[error("Permission denied: {action} requires an administrator")]
    PermissionDenied {
        /// Action that was attempted
        action: &'static str,
    },
}

impl Error {
    /// Wraps any displayable failure as a gateway error for `operation`.
    pub fn remote(operation: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Remote {
            operation,
            message: source.to_string(),
        }
    }

    /// True for transient gateway failures.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
