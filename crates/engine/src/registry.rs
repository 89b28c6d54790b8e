//! Workspace registration and authentication.

use brigade_core::types::DbId;
use brigade_core::CoreError;
use brigade_db::models::workspace::NewWorkspace;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth;
use crate::error::{EngineError, EngineResult};
use crate::state::Engine;

/// Attempts at finding an unused entry password before giving up.
const MAX_ENTRY_PASSWORD_ATTEMPTS: usize = 16;

/// Request body for workspace creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    #[validate(length(min = 1, message = "Workspace name is required"))]
    pub name: String,
    #[validate(email(message = "Admin email must be a valid address"))]
    pub admin_email: String,
    #[validate(length(min = 1, message = "Admin password is required"))]
    pub admin_password: String,
    /// Staff addresses to invite; ignored when SMTP is unconfigured.
    #[serde(default)]
    pub invites: Vec<String>,
}

/// Result of workspace creation. The plaintext entry password is
/// returned here exactly once; only its digest is stored.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedWorkspace {
    pub workspace_id: DbId,
    pub entry_password: String,
}

/// Result of a successful entry-password verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryVerification {
    pub workspace_id: DbId,
    pub name: String,
}

impl Engine {
    /// Create a workspace with a fresh, globally-unique entry password
    /// distinct from the admin password.
    pub async fn create_workspace(
        &self,
        request: CreateWorkspaceRequest,
    ) -> EngineResult<CreatedWorkspace> {
        // 1. Field validation.
        request
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        // 2. Hash the admin credential.
        let admin_password_hash = auth::hash_password(&request.admin_password)
            .map_err(|e| EngineError::Internal(format!("password hashing failed: {e}")))?;

        // 3. Allocate an entry password nobody else holds. The digest
        //    column is unique, so a racing create would still fail the
        //    insert rather than produce an ambiguous lookup.
        let (entry_password, entry_password_digest) = self
            .allocate_entry_password(&request.admin_password)
            .await?;

        // 4. Persist.
        let row = self
            .store
            .insert_workspace(&NewWorkspace {
                name: request.name.trim().to_string(),
                admin_email: request.admin_email.trim().to_string(),
                admin_password_hash,
                entry_password_digest,
            })
            .await?;
        tracing::info!(workspace_id = row.id, name = %row.name, "workspace created");

        // 5. Invitations are best-effort and never fail the operation.
        self.send_invites(&request.invites, &row.name, &row.admin_email, &entry_password)
            .await;

        Ok(CreatedWorkspace {
            workspace_id: row.id,
            entry_password,
        })
    }

    /// Check an admin password. Returns a bare boolean, fails closed:
    /// an unknown workspace or an internal failure both answer `false`,
    /// revealing nothing about workspace existence.
    pub async fn verify_admin_password(&self, workspace_id: DbId, password: &str) -> bool {
        let row = match self.store.find_workspace(workspace_id).await {
            Ok(Some(row)) => row,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(workspace_id, error = %e, "admin verification failed closed");
                return false;
            }
        };
        match auth::verify_password(password, &row.admin_password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(workspace_id, error = %e, "admin verification failed closed");
                false
            }
        }
    }

    /// Resolve an entry password to its workspace. Value-only lookup;
    /// a miss is indistinct from a wrong password.
    pub async fn verify_entry_password(
        &self,
        password: &str,
    ) -> EngineResult<EntryVerification> {
        let digest = auth::entry_digest(password.trim());
        match self.store.find_workspace_by_entry_digest(&digest).await? {
            Some(row) => Ok(EntryVerification {
                workspace_id: row.id,
                name: row.name,
            }),
            None => Err(CoreError::Unauthorized("Invalid entry password".to_string()).into()),
        }
    }

    /// Generate entry-password candidates until one is distinct from
    /// the admin password and unused across all workspaces.
    async fn allocate_entry_password(
        &self,
        admin_password: &str,
    ) -> EngineResult<(String, String)> {
        for _ in 0..MAX_ENTRY_PASSWORD_ATTEMPTS {
            let candidate = auth::generate_entry_password(self.config.entry_password_len);
            if candidate == admin_password {
                continue;
            }
            let digest = auth::entry_digest(&candidate);
            if self
                .store
                .find_workspace_by_entry_digest(&digest)
                .await?
                .is_some()
            {
                continue;
            }
            return Ok((candidate, digest));
        }
        Err(EngineError::Internal(
            "could not allocate a unique entry password".to_string(),
        ))
    }

    /// Deliver invitations, logging per-recipient outcomes.
    async fn send_invites(
        &self,
        invites: &[String],
        workspace_name: &str,
        admin_email: &str,
        entry_password: &str,
    ) {
        let recipients: Vec<&str> = invites
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if recipients.is_empty() {
            return;
        }
        let Some(mailer) = &self.mailer else {
            tracing::debug!(
                count = recipients.len(),
                "SMTP not configured; skipping invitations"
            );
            return;
        };
        for to in recipients {
            match mailer
                .send_invite(to, workspace_name, admin_email, entry_password)
                .await
            {
                Ok(()) => tracing::info!(to, "invitation sent"),
                Err(e) => tracing::warn!(to, error = %e, "invitation delivery failed"),
            }
        }
    }
}
