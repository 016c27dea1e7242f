use std::collections::BTreeMap;

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{NewProfile, ProfileChanges, ProfileStore, StoreError};
use crate::profiles::model::UserProfile;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, UserProfile>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

/// In-process store with the same uniqueness and id rules as the SQL table.
#[derive(Default)]
pub struct MemoryProfileStore {
    table: RwLock<Table>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `is_active`; no HTTP operation exposes this.
    pub async fn set_active(&self, id: i64, active: bool) {
        if let Some(profile) = self.table.write().await.rows.get_mut(&id) {
            profile.is_active = active;
        }
    }
}

fn matches_all(profile: &UserProfile, terms: &[String]) -> bool {
    let email = profile.email.to_lowercase();
    let name = profile.name.to_lowercase();
    terms.iter().all(|t| {
        let t = t.to_lowercase();
        email.contains(&t) || name.contains(&t)
    })
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn insert(&self, new: NewProfile) -> Result<UserProfile, StoreError> {
        let mut table = self.table.write().await;
        if table.email_taken(&new.email, None) {
            return Err(StoreError::DuplicateEmail);
        }
        table.last_id += 1;
        let profile = UserProfile {
            id: table.last_id,
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            is_active: true,
            is_staff: new.is_staff,
            is_superuser: new.is_superuser,
            created_at: OffsetDateTime::now_utc(),
        };
        table.rows.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|p| p.email == email).cloned())
    }

    async fn list(&self, terms: &[String]) -> Result<Vec<UserProfile>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|p| matches_all(p, terms))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<UserProfile>, StoreError> {
        let mut table = self.table.write().await;
        if let Some(email) = &changes.email {
            if table.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(hash) = changes.password_hash {
            row.password_hash = hash;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(email: &str, name: &str) -> NewProfile {
        NewProfile {
            email: email.into(),
            name: name.into(),
            password_hash: "hash".into(),
            is_staff: false,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryProfileStore::new();
        let a = store.insert(new_profile("a@x.com", "A")).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        let b = store.insert(new_profile("b@x.com", "B")).await.unwrap();
        assert!(b.id > a.id);
        assert!(!store.delete(a.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_on_insert_and_update() {
        let store = MemoryProfileStore::new();
        store.insert(new_profile("a@x.com", "A")).await.unwrap();
        let b = store.insert(new_profile("b@x.com", "B")).await.unwrap();

        assert!(matches!(
            store.insert(new_profile("a@x.com", "Other")).await,
            Err(StoreError::DuplicateEmail)
        ));

        let changes = ProfileChanges {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(b.id, changes).await,
            Err(StoreError::DuplicateEmail)
        ));

        // Keeping your own email is not a clash.
        let same = ProfileChanges {
            email: Some("b@x.com".into()),
            ..Default::default()
        };
        assert!(store.update(b.id, same).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_missing_row_returns_none() {
        let store = MemoryProfileStore::new();
        let out = store.update(99, ProfileChanges::default()).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn list_ands_terms_across_email_and_name() {
        let store = MemoryProfileStore::new();
        store.insert(new_profile("ann@x.com", "Ann Lee")).await.unwrap();
        store.insert(new_profile("bob@y.org", "Bob Lee")).await.unwrap();
        store.insert(new_profile("cat@x.com", "Cat")).await.unwrap();

        let all = store.list(&[]).await.unwrap();
        assert_eq!(all.len(), 3);

        let lee: Vec<_> = store
            .list(&["LEE".into()])
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.email)
            .collect();
        assert_eq!(lee, vec!["ann@x.com", "bob@y.org"]);

        let narrowed = store.list(&["lee".into(), "x.com".into()]).await.unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].email, "ann@x.com");
    }
}
