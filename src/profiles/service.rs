use std::sync::Arc;

use axum::http::Method;
use tracing::{info, warn};

use crate::{
    error::AppError,
    profiles::{
        dto::{ProfilePayload, ProfileSummary, SearchQuery},
        manager,
        model::UserProfile,
        permissions::may_access,
        validation::validate,
    },
    store::{ProfileChanges, ProfileStore},
};

/// The profile operations, bound to one store handle.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }

    pub async fn list(&self, query: &SearchQuery) -> Result<Vec<ProfileSummary>, AppError> {
        let rows = self.store.list(&query.terms()).await?;
        Ok(rows.into_iter().map(ProfileSummary::from).collect())
    }

    pub async fn create(&self, payload: ProfilePayload) -> Result<ProfileSummary, AppError> {
        let clean = validate(payload, false).map_err(AppError::Validation)?;
        let (Some(email), Some(name), Some(password)) = (clean.email, clean.name, clean.password)
        else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "full validation left a required field empty"
            )));
        };
        let profile = manager::create_user(self.store(), &email, &name, &password).await?;
        Ok(profile.into())
    }

    pub async fn retrieve(&self, id: i64) -> Result<ProfileSummary, AppError> {
        let profile = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        Ok(profile.into())
    }

    pub async fn update(
        &self,
        actor: &UserProfile,
        id: i64,
        payload: Result<ProfilePayload, AppError>,
    ) -> Result<ProfileSummary, AppError> {
        self.write(Method::PUT, actor, id, payload).await
    }

    pub async fn partial_update(
        &self,
        actor: &UserProfile,
        id: i64,
        payload: Result<ProfilePayload, AppError>,
    ) -> Result<ProfileSummary, AppError> {
        self.write(Method::PATCH, actor, id, payload).await
    }

    pub async fn delete(&self, actor: &UserProfile, id: i64) -> Result<(), AppError> {
        self.authorized_target(&Method::DELETE, actor, id).await?;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        info!(profile_id = id, "profile deleted");
        Ok(())
    }

    /// Resolves a profile by login credentials. Inactive profiles never authenticate.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".into());
        let email = manager::normalize_email(email);

        let Some(profile) = self.store.find_by_email(&email).await? else {
            manager::dummy_verify(password);
            warn!(email = %email, "login unknown email");
            return Err(invalid());
        };
        if !manager::check_password(&profile, password)? {
            warn!(profile_id = profile.id, "login invalid password");
            return Err(invalid());
        }
        if !profile.is_active {
            warn!(profile_id = profile.id, "login inactive profile");
            return Err(invalid());
        }
        Ok(profile)
    }

    /// Loads the profile a token speaks for, if it still exists and is active.
    pub async fn find_active(&self, id: i64) -> Result<Option<UserProfile>, AppError> {
        Ok(self
            .store
            .find_by_id(id)
            .await?
            .filter(|profile| profile.is_active))
    }

    async fn authorized_target(
        &self,
        method: &Method,
        actor: &UserProfile,
        id: i64,
    ) -> Result<UserProfile, AppError> {
        let target = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if !may_access(method, Some(actor), &target) {
            warn!(actor_id = actor.id, target_id = id, %method, "write denied");
            return Err(AppError::Forbidden);
        }
        Ok(target)
    }

    /// `payload` is the body as the handler parsed it. A body that failed to
    /// parse only surfaces once the target exists and the actor may write it.
    async fn write(
        &self,
        method: Method,
        actor: &UserProfile,
        id: i64,
        payload: Result<ProfilePayload, AppError>,
    ) -> Result<ProfileSummary, AppError> {
        self.authorized_target(&method, actor, id).await?;

        let clean = validate(payload?, method == Method::PATCH).map_err(AppError::Validation)?;
        let password_hash = clean
            .password
            .as_deref()
            .map(manager::set_password)
            .transpose()?;
        let changes = ProfileChanges {
            email: clean.email,
            name: clean.name,
            password_hash,
        };

        let updated = self
            .store
            .update(id, changes)
            .await?
            .ok_or(AppError::NotFound)?;
        info!(profile_id = id, %method, "profile updated");
        Ok(updated.into())
    }
}
