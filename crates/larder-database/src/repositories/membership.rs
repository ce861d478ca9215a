//! Membership repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_entity::membership::{CreateMembership, GroupRole, Membership};

use super::{MembershipRepository, map_sqlx_error, unique_constraint};

/// Postgres-backed membership repository.
#[derive(Debug, Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn missing(account_id: Uuid, group_id: Uuid) -> AppError {
    AppError::not_found(format!(
        "Account {account_id} is not a member of household {group_id}"
    ))
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn find(&self, account_id: Uuid, group_id: Uuid) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM household_members WHERE account_id = $1 AND group_id = $2",
        )
        .bind(account_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find membership", e))
    }

    async fn find_by_group(&self, group_id: Uuid) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM household_members WHERE group_id = $1 ORDER BY created_at",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list household members", e))
    }

    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM household_members WHERE account_id = $1 ORDER BY created_at",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list account memberships", e))
    }

    async fn create(&self, data: &CreateMembership) -> AppResult<Membership> {
        let now = Utc::now();
        sqlx::query_as::<_, Membership>(
            "INSERT INTO household_members (id, account_id, group_id, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $5) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.account_id)
        .bind(data.group_id)
        .bind(data.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).map(str::to_owned).as_deref() {
            Some("household_members_account_group_key") => {
                AppError::already_exists("Account is already a member of this household")
            }
            _ => map_sqlx_error("Failed to create membership", e),
        })
    }

    async fn update_role(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        role: GroupRole,
    ) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "UPDATE household_members SET role = $3, updated_at = $4 \
             WHERE account_id = $1 AND group_id = $2 RETURNING *",
        )
        .bind(account_id)
        .bind(group_id)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update membership role", e))?
        .ok_or_else(|| missing(account_id, group_id))
    }

    async fn set_active(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        active: bool,
    ) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "UPDATE household_members SET is_active = $3, updated_at = $4 \
             WHERE account_id = $1 AND group_id = $2 RETURNING *",
        )
        .bind(account_id)
        .bind(group_id)
        .bind(active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update membership status", e))?
        .ok_or_else(|| missing(account_id, group_id))
    }

    async fn delete(&self, account_id: Uuid, group_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM household_members WHERE account_id = $1 AND group_id = $2")
                .bind(account_id)
                .bind(group_id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to remove membership", e))?;

        if result.rows_affected() == 0 {
            return Err(missing(account_id, group_id));
        }
        Ok(())
    }
}
