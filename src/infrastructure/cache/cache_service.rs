//! Cache Service
//!
//! JSON values in Redis under the service namespace.
//!
//! ```rust,ignore
//! use tour_service::infrastructure::cache::{Cache, RedisCache};
//!
//! let cache = RedisCache::with_prefix(redis_connection, "tours:");
//! cache.put("role:42", &Role::Guide, 300).await?;
//! let role: Option<Role> = cache.get("role:42").await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use crate::shared::error::AppError;

/// Expiring key/value store used for lookups that are costly to repeat.
#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` on a miss. A stored value that no longer decodes is an error.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Stores `value`, expiring after `ttl_secs`.
    async fn put<T: Serialize + Sync + Send>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Redis-backed [`Cache`]. Cloning shares the underlying connection manager.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    prefix: Arc<str>,
}

impl RedisCache {
    pub fn with_prefix(conn: ConnectionManager, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }
}

pub(crate) fn namespaced(prefix: &str, key: &str) -> String {
    let mut full = String::with_capacity(prefix.len() + key.len());
    full.push_str(prefix);
    full.push_str(key);
    full
}

fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Cache encode failed: {}", e)))
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::Internal(format!("Cache decode failed: {}", e)))
}

#[async_trait]
impl Cache for RedisCache {
    #[instrument(skip(self), level = "debug")]
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError> {
        let key = namespaced(&self.prefix, key);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.get(&key).await?;
        debug!(key = %key, hit = raw.is_some(), "Cache lookup");
        raw.as_deref().map(decode).transpose()
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn put<T: Serialize + Sync + Send>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        let key = namespaced(&self.prefix, key);
        let raw = encode(value)?;
        let mut conn = self.conn.clone();

        let _: () = conn.set_ex(&key, raw, ttl_secs).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
