//! User persistence - Registration, lookup and credential checks.
//!
//! Passwords are never stored: each user gets a random salt and the row keeps the
//! hex SHA-256 digest of salt and password.

use crate::{
    core::validation,
    db::favorites,
    entities::{User, user},
    errors::{Error, Result},
    models::{NewUser, UserProfile},
};
use sea_orm::{Set, prelude::*};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use tracing::{info, instrument, warn};

/// Hex digest of `salt` followed by `password`.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}

/// Retrieves a user row by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by exact display name.
pub async fn find_user_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a user together with their favorites.
///
/// # Errors
/// Returns [`Error::NotFound`] if no user has this id.
pub async fn get_user_profile(db: &DatabaseConnection, user_id: i64) -> Result<UserProfile> {
    let user = get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })?;
    let favorites = favorites::favorites_for_user(db, user_id).await?;
    Ok(UserProfile::from_model(user, favorites))
}

/// Registers a new account.
///
/// # Errors
/// Returns an error if:
/// - The registration form fails [`validation::validate_registration`]
/// - Another user already has this display name
/// - The database insert operation fails
#[instrument(skip(db, new_user), fields(name = %new_user.name))]
pub async fn create_user(
    db: &DatabaseConnection,
    new_user: NewUser,
    is_admin: bool,
) -> Result<user::Model> {
    validation::validate_registration(&new_user)?;

    let name = new_user.name.trim().to_string();
    if find_user_by_name(db, &name).await?.is_some() {
        return Err(Error::DuplicateName { name });
    }

    let salt = uuid::Uuid::new_v4().simple().to_string();
    let user = user::ActiveModel {
        name: Set(name),
        email: Set(new_user.email.trim().to_string()),
        avatar: Set(new_user.avatar),
        is_admin: Set(is_admin),
        password_hash: Set(hash_password(&salt, &new_user.password)),
        password_salt: Set(salt),
        preferences: Set(new_user.preferences),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = user.insert(db).await?;
    info!("Registered user '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Checks a name/password pair.
///
/// Unknown names and wrong passwords produce the same error.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    name: &str,
    password: &str,
) -> Result<user::Model> {
    let rejected = || Error::Authentication {
        message: "Invalid name or password".to_string(),
    };
    let user = find_user_by_name(db, name).await?.ok_or_else(rejected)?;
    if hash_password(&user.password_salt, password) == user.password_hash {
        Ok(user)
    } else {
        warn!("Rejected login attempt for '{}'", user.name);
        Err(rejected())
    }
}
