//! User Role Repository
//!
//! Read-only role lookups against the stakeholders database, used when a
//! bearer token carries no `role` claim.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::services::RoleResolver;
use crate::domain::{Role, UserId};
use crate::shared::error::AppError;

/// Resolves roles from the stakeholders `users` table.
#[derive(Clone)]
pub struct PgUserRoleRepository {
    pool: PgPool,
}

impl PgUserRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleResolver for PgUserRoleRepository {
    async fn resolve_role(&self, user_id: UserId) -> Result<Option<Role>, AppError> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(role.as_deref().and_then(Role::parse))
    }
}
