//! Cache Module
//!
//! Redis connection management and caching utilities.
//!
//! This module provides:
//! - Redis connection management with automatic reconnection
//! - A generic `Cache` trait with a `RedisCache` implementation
//! - A read-through cache for stakeholders role lookups
//!
//! ```text
//! +--------------------+
//! | CachedRoleResolver |
//! +--------------------+
//!          |
//!          v
//! +-------------------+
//! |   Cache Trait     |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! |   RedisCache      |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! | ConnectionManager |
//! +-------------------+
//! ```

mod cache_service;
mod role_cache;

pub use cache_service::{Cache, RedisCache};
pub use role_cache::CachedRoleResolver;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Creates a `RedisCache` with the service key prefix.
pub async fn create_redis_cache(settings: &RedisSettings) -> Result<RedisCache, redis::RedisError> {
    let conn = create_redis_client(settings).await?;
    Ok(RedisCache::with_prefix(conn, keys::SERVICE_PREFIX))
}

/// Cache key prefixes.
pub mod keys {
    /// Namespace for every key this service writes
    pub const SERVICE_PREFIX: &str = "tours:";

    /// Prefix for resolved user roles (e.g., "role:user_id")
    pub const USER_ROLE: &str = "role:";

    /// Generates a role key for a user
    #[inline]
    pub fn role(user_id: impl std::fmt::Display) -> String {
        format!("{}{}", USER_ROLE, user_id)
    }
}
