//! Role resolution for tokens that carry no role claim.

use async_trait::async_trait;

use crate::domain::value_objects::{Role, UserId};
use crate::shared::error::AppError;

/// Looks up a user's platform role from an authoritative store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// `Ok(None)` when the user is unknown or the stored role is unrecognized.
    async fn resolve_role(&self, user_id: UserId) -> Result<Option<Role>, AppError>;
}
