/// Catalog seed data loaded from config.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;

/// Identity persistence settings from environment variables
pub mod identity;
