//! Construction of profile records.
//!
//! Every profile is built here: all fields go through the same validation as
//! the HTTP payloads and the password is hashed before anything reaches the
//! store.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::{error, info};

use crate::{
    error::AppError,
    profiles::{dto::ProfilePayload, model::UserProfile, validation::validate},
    store::{NewProfile, ProfileStore},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Trims the address and lowercases its domain part. The local part keeps its case.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hash for a replacement password. Update paths go through here only.
pub fn set_password(plain: &str) -> Result<String, AppError> {
    Ok(hash_password(plain)?)
}

pub fn check_password(profile: &UserProfile, plain: &str) -> anyhow::Result<bool> {
    verify_password(plain, &profile.password_hash)
}

/// Runs one argon2 verification against a throwaway hash and always fails.
/// Login calls this for unknown emails so they cost as much as a wrong password.
pub fn dummy_verify(plain: &str) -> bool {
    lazy_static! {
        static ref DUMMY_HASH: Option<String> = hash_password("dummy-password").ok();
    }
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
    false
}

pub async fn create_user(
    store: &dyn ProfileStore,
    email: &str,
    name: &str,
    password: &str,
) -> Result<UserProfile, AppError> {
    create(store, email, name, password, false).await
}

pub async fn create_superuser(
    store: &dyn ProfileStore,
    email: &str,
    name: &str,
    password: &str,
) -> Result<UserProfile, AppError> {
    create(store, email, name, password, true).await
}

async fn create(
    store: &dyn ProfileStore,
    email: &str,
    name: &str,
    password: &str,
    superuser: bool,
) -> Result<UserProfile, AppError> {
    let clean = validate(
        ProfilePayload::new(Some(email), Some(name), Some(password)),
        false,
    )
    .map_err(AppError::Validation)?;
    let (Some(email), Some(name), Some(password)) = (clean.email, clean.name, clean.password)
    else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "full validation left a required field empty"
        )));
    };

    let password_hash = hash_password(&password)?;
    let profile = store
        .insert(NewProfile {
            email,
            name,
            password_hash,
            is_staff: superuser,
            is_superuser: superuser,
        })
        .await?;

    info!(
        profile_id = profile.id,
        email = %profile.email,
        name = profile.full_name(),
        superuser,
        "profile created"
    );
    Ok(profile)
}
