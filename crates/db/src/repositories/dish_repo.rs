//! Repository for the `dishes` table. Every query is workspace-scoped.

use brigade_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dish::{DishRow, NewDish};

/// Column list for `dishes` queries.
const COLUMNS: &str = "id, workspace_id, name, prep_time_minutes, image_ref, ingredients, \
                       substitutions, created_at, updated_at";

/// Provides CRUD operations for menu dishes.
pub struct DishRepo;

impl DishRepo {
    /// All dishes of a workspace, ascending id.
    pub async fn list_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<DishRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dishes WHERE workspace_id = $1 ORDER BY id");
        sqlx::query_as::<_, DishRow>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch one dish, scoped to its workspace.
    pub async fn find(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<DishRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dishes WHERE workspace_id = $1 AND id = $2");
        sqlx::query_as::<_, DishRow>(&query)
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a dish and return the stored row.
    pub async fn insert(pool: &PgPool, new: &NewDish) -> Result<DishRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dishes (workspace_id, name, prep_time_minutes, image_ref, ingredients, substitutions) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DishRow>(&query)
            .bind(new.workspace_id)
            .bind(&new.name)
            .bind(new.prep_time_minutes)
            .bind(&new.image_ref)
            .bind(&new.ingredients)
            .bind(Json(&new.substitutions))
            .fetch_one(pool)
            .await
    }

    /// Replace the mutable fields of a dish. Returns `None` when the id
    /// is absent from the workspace.
    pub async fn update(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
        new: &NewDish,
    ) -> Result<Option<DishRow>, sqlx::Error> {
        let query = format!(
            "UPDATE dishes SET name = $3, prep_time_minutes = $4, image_ref = $5, \
                 ingredients = $6, substitutions = $7, updated_at = now() \
             WHERE workspace_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DishRow>(&query)
            .bind(workspace_id)
            .bind(id)
            .bind(&new.name)
            .bind(new.prep_time_minutes)
            .bind(&new.image_ref)
            .bind(&new.ingredients)
            .bind(Json(&new.substitutions))
            .fetch_optional(pool)
            .await
    }

    /// Overwrite only the prep-time estimate (adaptive revision).
    pub async fn set_prep_time(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
        prep_time_minutes: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE dishes SET prep_time_minutes = $3, updated_at = now() \
             WHERE workspace_id = $1 AND id = $2",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(prep_time_minutes)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one dish. Returns `false` when nothing matched.
    pub async fn delete(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dishes WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every dish of a workspace; other workspaces untouched.
    pub async fn delete_all(pool: &PgPool, workspace_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dishes WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of dishes in a workspace.
    pub async fn count(pool: &PgPool, workspace_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dishes WHERE workspace_id = $1")
            .bind(workspace_id)
            .fetch_one(pool)
            .await
    }
}
