//! Workspace (tenant) rows.

use brigade_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `workspaces` table.
///
/// Credential columns are skipped during serialization so a row can be
/// returned to callers without leaking hashes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceRow {
    pub id: DbId,
    pub name: String,
    pub admin_email: String,
    /// Argon2id PHC string for the admin password.
    #[serde(skip_serializing)]
    pub admin_password_hash: String,
    /// SHA-256 hex digest of the entry password; globally unique and
    /// used as the value-only lookup key.
    #[serde(skip_serializing)]
    pub entry_password_digest: String,
    pub created_at: Timestamp,
}

/// Insert payload for a new workspace. Credentials arrive pre-hashed.
#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub name: String,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub entry_password_digest: String,
}
