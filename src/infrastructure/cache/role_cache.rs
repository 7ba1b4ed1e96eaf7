//! Role cache
//!
//! Wraps a [`RoleResolver`] with a read-through cache so each stakeholders
//! lookup is paid at most once per TTL.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::cache_service::Cache;
use super::keys;
use crate::domain::services::RoleResolver;
use crate::domain::{Role, UserId};
use crate::shared::error::AppError;

/// Read-through role cache.
pub struct CachedRoleResolver<C: Cache> {
    inner: Arc<dyn RoleResolver>,
    cache: C,
    ttl_secs: u64,
}

impl<C: Cache> CachedRoleResolver<C> {
    pub fn new(inner: Arc<dyn RoleResolver>, cache: C, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait]
impl<C: Cache> RoleResolver for CachedRoleResolver<C> {
    async fn resolve_role(&self, user_id: UserId) -> Result<Option<Role>, AppError> {
        let key = keys::role(user_id);

        // A cache outage degrades to a direct lookup.
        match self.cache.get::<Role>(&key).await {
            Ok(Some(role)) => return Ok(Some(role)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Role cache read failed"),
        }

        let role = self.inner.resolve_role(user_id).await?;
        if let Some(role) = role {
            if let Err(e) = self.cache.put(&key, &role, self.ttl_secs).await {
                warn!(error = %e, "Role cache write failed");
            }
        }
        Ok(role)
    }
}
