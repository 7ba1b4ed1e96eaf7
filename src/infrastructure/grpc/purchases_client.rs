//! Purchases service client
//!
//! Holds a lazily established channel. The channel is dropped on any transport
//! failure and re-established before the next call.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::Code;
use tracing::{debug, info, instrument, warn};

use super::purchases::purchases_service_client::PurchasesServiceClient;
use super::purchases::VerifyPurchaseRequest;
use crate::config::PurchasesSettings;
use crate::domain::services::{Entitlement, EntitlementError, PurchaseVerifier};
use crate::domain::UserId;

/// gRPC implementation of [`PurchaseVerifier`].
pub struct PurchasesGrpcClient {
    addr: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    channel: RwLock<Option<Channel>>,
}

impl PurchasesGrpcClient {
    pub fn new(settings: &PurchasesSettings) -> Self {
        Self {
            addr: settings.addr.clone(),
            connect_timeout: settings.connect_timeout(),
            request_timeout: settings.request_timeout(),
            channel: RwLock::new(None),
        }
    }

    /// Returns the cached channel or dials a new one.
    async fn channel(&self) -> Result<Channel, EntitlementError> {
        let cached = self.channel.read().clone();
        if let Some(channel) = cached {
            return Ok(channel);
        }

        info!(addr = %self.addr, "Connecting to purchases service");
        let endpoint = Endpoint::from_shared(self.addr.clone())
            .map_err(|e| EntitlementError::Unreachable(e.to_string()))?
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .tcp_keepalive(Some(Duration::from_secs(10)));

        let channel = match tokio::time::timeout(self.connect_timeout, endpoint.connect()).await {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => {
                warn!(addr = %self.addr, error = %e, "Failed to connect to purchases service");
                return Err(EntitlementError::Unreachable(e.to_string()));
            }
            Err(_) => {
                warn!(addr = %self.addr, "Timed out connecting to purchases service");
                return Err(EntitlementError::Timeout);
            }
        };

        info!(addr = %self.addr, "Connected to purchases service");
        *self.channel.write() = Some(channel.clone());
        Ok(channel)
    }

    fn reset(&self) {
        if self.channel.write().take().is_some() {
            warn!("Reset purchases service connection after error");
        }
    }

    /// Ids travel as int64; int32 peers read the same varint for ids that fit.
    fn wire_request(user_id: UserId, tour_id: i64) -> VerifyPurchaseRequest {
        VerifyPurchaseRequest {
            user_id: user_id.value(),
            tour_id,
        }
    }
}

#[async_trait]
impl PurchaseVerifier for PurchasesGrpcClient {
    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn verify_purchase(
        &self,
        user_id: UserId,
        tour_id: i64,
    ) -> Result<Entitlement, EntitlementError> {
        let request = Self::wire_request(user_id, tour_id);
        let mut client = PurchasesServiceClient::new(self.channel().await?);

        let response =
            match tokio::time::timeout(self.request_timeout, client.verify_purchase(request)).await
            {
                Ok(Ok(response)) => response.into_inner(),
                Ok(Err(status)) => {
                    warn!(code = ?status.code(), message = %status.message(), "VerifyPurchase failed");
                    self.reset();
                    return Err(match status.code() {
                        Code::DeadlineExceeded | Code::Cancelled => EntitlementError::Timeout,
                        _ => EntitlementError::Unreachable(status.message().to_string()),
                    });
                }
                Err(_) => {
                    warn!("VerifyPurchase timed out");
                    self.reset();
                    return Err(EntitlementError::Timeout);
                }
            };

        if !response.error.is_empty() {
            warn!(error = %response.error, "Purchases service reported an error");
            return Err(EntitlementError::Rejected(response.error));
        }

        debug!(
            has_purchased = response.has_purchased,
            token_id = %response.token_id,
            "Purchase verification result"
        );

        Ok(Entitlement {
            has_purchased: response.has_purchased,
            token_id: response.token_id,
            purchased_at: Some(response.purchased_at).filter(|s| !s.is_empty()),
        })
    }

    async fn is_reachable(&self) -> bool {
        self.channel().await.is_ok()
    }
}
