//! Group (household) repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_entity::group::{CreateGroup, Group, UpdateGroup};
use larder_entity::membership::{GroupRole, Membership};

use super::{GroupRepository, map_sqlx_error, unique_constraint};

/// Postgres-backed group repository.
#[derive(Debug, Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn missing(id: Uuid) -> AppError {
    AppError::not_found(format!("Household {id} not found"))
}

/// Map a write failure, naming the active-name index as a duplicate.
fn map_write_error(context: &str, name: &str, err: sqlx::Error) -> AppError {
    match unique_constraint(&err).map(str::to_owned).as_deref() {
        Some("households_active_name_key") => {
            AppError::already_exists(format!("Household '{name}' already exists"))
        }
        _ => map_sqlx_error(context, err),
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM households WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find household by id", e))
    }

    async fn create_with_owner(&self, data: &CreateGroup) -> AppResult<(Group, Membership)> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO households (id, name, address, is_active, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, TRUE, $4, $5, $5) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.address)
        .bind(data.created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error("Failed to create household", &data.name, e))?;

        let owner = sqlx::query_as::<_, Membership>(
            "INSERT INTO household_members (id, account_id, group_id, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $5) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.created_by)
        .bind(group.id)
        .bind(GroupRole::Owner)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to create owner membership", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit household creation", e))?;

        debug!(group_id = %group.id, "Household created with owner membership");
        Ok((group, owner))
    }

    async fn update(&self, id: Uuid, data: &UpdateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "UPDATE households SET name = COALESCE($2, name), address = COALESCE($3, address), \
             updated_at = $4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                "Failed to update household",
                data.name.as_deref().unwrap_or_default(),
                e,
            )
        })?
        .ok_or_else(|| missing(id))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Group> {
        let group = sqlx::query_as::<_, Group>(
            "UPDATE households SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;

        match group {
            Ok(group) => group.ok_or_else(|| missing(id)),
            Err(e) if unique_constraint(&e) == Some("households_active_name_key") => Err(
                AppError::already_exists("Another active household already uses this name"),
            ),
            Err(e) => Err(map_sqlx_error("Failed to update household status", e)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Memberships go with the household through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM households WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete household", e))?;

        if result.rows_affected() == 0 {
            return Err(missing(id));
        }
        debug!(group_id = %id, "Household deleted");
        Ok(())
    }
}
