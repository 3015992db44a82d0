//! Persistence layer - `SeaORM` CRUD functions, one module per table group.
//!
//! These functions back [`crate::gateway::DatabaseGateway`]; the client-side core
//! never calls them directly.

pub mod comments;
pub mod favorites;
pub mod games;
pub mod proposals;
pub mod seed;
pub mod taxonomy;
pub mod users;

pub use seed::{SeedSummary, seed_catalog};
