//! Purchase entitlement verification.
//!
//! The purchases service is the source of truth for whether a tourist bought a
//! tour. The engine depends only on [`PurchaseVerifier`]; the gRPC client lives
//! in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::value_objects::UserId;

/// Outcome of a successful verification round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub has_purchased: bool,
    /// Opaque purchase token issued by the purchases service.
    pub token_id: String,
    pub purchased_at: Option<String>,
}

impl Entitlement {
    pub fn purchased(token_id: impl Into<String>) -> Self {
        Self {
            has_purchased: true,
            token_id: token_id.into(),
            purchased_at: None,
        }
    }

    pub fn not_purchased() -> Self {
        Self {
            has_purchased: false,
            token_id: String::new(),
            purchased_at: None,
        }
    }
}

/// Verification could not produce an answer. Never treated as "purchased".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntitlementError {
    #[error("Purchase service unreachable: {0}")]
    Unreachable(String),

    #[error("Purchase verification timed out")]
    Timeout,

    #[error("Purchase service rejected the request: {0}")]
    Rejected(String),
}

/// Answers "did this user buy this tour".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseVerifier: Send + Sync {
    async fn verify_purchase(&self, user_id: UserId, tour_id: i64) -> Result<Entitlement, EntitlementError>;

    /// Readiness probe for the remote service.
    async fn is_reachable(&self) -> bool {
        true
    }
}
