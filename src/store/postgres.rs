use axum::async_trait;
use sqlx::PgPool;

use super::{NewProfile, ProfileChanges, ProfileStore, StoreError};
use crate::profiles::model::UserProfile;

const COLUMNS: &str =
    "id, email, name, password_hash, is_active, is_staff, is_superuser, created_at";

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Turns a unique-constraint violation into [`StoreError::DuplicateEmail`].
fn map_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(e),
    }
}

/// `ILIKE` pattern matching `term` literally anywhere in the column.
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn insert(&self, new: NewProfile) -> Result<UserProfile, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO user_profiles (email, name, password_hash, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(&new.email)
            .bind(&new.name)
            .bind(&new.password_hash)
            .bind(new.is_staff)
            .bind(new.is_superuser)
            .fetch_one(&self.db)
            .await
            .map_err(map_err)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM user_profiles WHERE id = $1");
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(map_err)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM user_profiles WHERE email = $1");
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(map_err)
    }

    async fn list(&self, terms: &[String]) -> Result<Vec<UserProfile>, StoreError> {
        let patterns: Vec<String> = terms.iter().map(|t| contains_pattern(t)).collect();
        // bool_and over an empty array is NULL, which means "no filter".
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM user_profiles
            WHERE COALESCE(
                (SELECT bool_and(email ILIKE p OR name ILIKE p) FROM unnest($1::text[]) AS p),
                TRUE
            )
            ORDER BY id
            "#
        );
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(patterns)
            .fetch_all(&self.db)
            .await
            .map_err(map_err)
    }

    async fn update(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!(
            r#"
            UPDATE user_profiles
               SET email = COALESCE($2, email),
                   name = COALESCE($3, name),
                   password_hash = COALESCE($4, password_hash)
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.name)
            .bind(changes.password_hash)
            .fetch_optional(&self.db)
            .await
            .map_err(map_err)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }
}
