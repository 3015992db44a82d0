//! Identity persistence settings.
//!
//! The current user id (and token pair) survives restarts in a small TOML file.
//! Its location comes from `IDENTITY_PATH` in the environment or `.env`.

use std::path::PathBuf;

const DEFAULT_IDENTITY_PATH: &str = "data/identity.toml";

/// Location of the persisted identity file.
#[must_use]
pub fn get_identity_path() -> PathBuf {
    std::env::var("IDENTITY_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_IDENTITY_PATH), PathBuf::from)
}
