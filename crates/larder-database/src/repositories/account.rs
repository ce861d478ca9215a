//! Account repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_entity::account::{Account, CreateAccount, SealedField};

use super::{AccountRepository, map_sqlx_error, unique_constraint};

/// Postgres-backed account repository.
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find account by id", e))
    }

    async fn find_by_email(&self, email: &SealedField) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find account by email", e))
    }

    async fn find_by_invitation_token(&self, token: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE invitation_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find account by invitation token", e))
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to list accounts", e))
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let now = Utc::now();
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, username, email, password_hash, role, is_active, \
             email_verified, invitation_token, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, FALSE, $6, $7, $7) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(&data.invitation_token)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).map(str::to_owned).as_deref() {
            Some("accounts_email_key") => AppError::already_exists("Email already registered"),
            Some("accounts_username_key") => AppError::already_exists("Username already taken"),
            _ => map_sqlx_error("Failed to create account", e),
        })
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET email_verified = TRUE, invitation_token = NULL, updated_at = $2 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to mark account verified", e))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn set_invitation_token(&self, id: Uuid, token: &str) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET invitation_token = $2, email_verified = FALSE, updated_at = $3 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to set invitation token", e))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update account status", e))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }
}
