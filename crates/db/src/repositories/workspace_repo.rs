//! Repository for the `workspaces` table.

use brigade_core::types::DbId;
use sqlx::PgPool;

use crate::models::workspace::{NewWorkspace, WorkspaceRow};

/// Column list for `workspaces` queries.
const COLUMNS: &str = "id, name, admin_email, admin_password_hash, entry_password_digest, created_at";

/// Provides access to workspace (tenant) rows.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Insert a new workspace and return the stored row.
    pub async fn insert(pool: &PgPool, new: &NewWorkspace) -> Result<WorkspaceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (name, admin_email, admin_password_hash, entry_password_digest) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceRow>(&query)
            .bind(&new.name)
            .bind(&new.admin_email)
            .bind(&new.admin_password_hash)
            .bind(&new.entry_password_digest)
            .fetch_one(pool)
            .await
    }

    /// Fetch a workspace by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkspaceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1");
        sqlx::query_as::<_, WorkspaceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a workspace by its entry-password digest (the value-only
    /// lookup). The digest column carries a unique constraint.
    pub async fn find_by_entry_digest(
        pool: &PgPool,
        digest: &str,
    ) -> Result<Option<WorkspaceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE entry_password_digest = $1");
        sqlx::query_as::<_, WorkspaceRow>(&query)
            .bind(digest)
            .fetch_optional(pool)
            .await
    }

    /// All workspace ids, ascending. Used by startup recovery.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM workspaces ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
