//! Catalog seed configuration loading from config.toml
//!
//! The taxonomy reference data (genres, platforms, accessibility tags), an optional
//! set of starting games and an optional administrator account are declared in
//! config.toml and written to the database on first run. Games refer to taxonomy
//! entries by name so the file does not depend on generated ids.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Genre names
    #[serde(default)]
    pub genres: Vec<String>,
    /// Platform names
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Accessibility tags
    #[serde(default)]
    pub accessibility_tags: Vec<TagConfig>,
    /// Games to place in an empty catalog
    #[serde(default)]
    pub games: Vec<GameConfig>,
    /// Administrator account to create if no user with that name exists
    pub admin: Option<AdminConfig>,
}

/// Configuration for a single accessibility tag
#[derive(Debug, Deserialize, Clone)]
pub struct TagConfig {
    /// Short display name
    pub name: String,
    /// Explanation of the feature
    #[serde(default)]
    pub description: String,
}

/// Configuration for a single seeded game
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub min_age: i32,
    #[serde(default)]
    pub developer: String,
    pub cover_image: Option<String>,
    /// Genre names, resolved against `genres`
    #[serde(default)]
    pub genres: Vec<String>,
    /// Platform names, resolved against `platforms`
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Accessibility tag names, resolved against `accessibility_tags`
    #[serde(default)]
    pub accessibility_tags: Vec<String>,
}

/// Seeded administrator
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Loads the catalog configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading catalog configuration from {path_ref:?}");
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {path_ref:?}: {e}"),
    })
}

/// Loads the catalog configuration from `CATALOG_CONFIG`, or ./config.toml when unset
pub fn load_default_config() -> Result<CatalogConfig> {
    let path = std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
