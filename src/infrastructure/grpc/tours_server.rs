//! Tours gRPC server
//!
//! Lets peer services (purchases, shopping cart) check that tours exist and
//! can be sold. Lookup failures are reported in the response `error` field,
//! never as transport errors.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{error, info, instrument, warn};

use super::tours::tours_service_server::{ToursService, ToursServiceServer};
use super::tours::{
    ReserveToursRequest, ReserveToursResponse, VerifyTokenRequest, VerifyTokenResponse,
    VerifyTourRequest, VerifyTourResponse,
};
use crate::domain::{Tour, TourRepository, TourStatus};
use crate::infrastructure::metrics;

const TOUR_NOT_FOUND: &str = "Tour not found";
const LOOKUP_FAILED: &str = "Tour lookup failed";

/// [`ToursService`] backed by the tour catalog.
pub struct ToursGrpcService {
    tours: Arc<dyn TourRepository>,
}

impl ToursGrpcService {
    pub fn new(tours: Arc<dyn TourRepository>) -> Self {
        Self { tours }
    }

    /// `Err` carries the message for the response `error` field.
    async fn lookup(&self, tour_id: i64) -> Result<Option<Tour>, &'static str> {
        self.tours.find_by_id(tour_id).await.map_err(|e| {
            error!(tour_id, error = %e, "Tour lookup failed");
            LOOKUP_FAILED
        })
    }

    /// First reason the tours cannot be sold, if any.
    async fn unsellable(&self, tour_ids: &[i64]) -> Option<String> {
        for &tour_id in tour_ids {
            match self.lookup(tour_id).await {
                Err(message) => return Some(message.to_string()),
                Ok(None) => return Some(format!("Tour {} not found", tour_id)),
                Ok(Some(tour)) if tour.status != TourStatus::Published => {
                    return Some(format!(
                        "Tour {} is not available for purchase (status: {})",
                        tour_id, tour.status
                    ));
                }
                Ok(Some(_)) => {}
            }
        }
        None
    }
}

#[async_trait]
impl ToursService for ToursGrpcService {
    #[instrument(skip_all, fields(tour_id = request.get_ref().tour_id))]
    async fn verify_tour_exists(
        &self,
        request: Request<VerifyTourRequest>,
    ) -> Result<Response<VerifyTourResponse>, Status> {
        let tour_id = request.into_inner().tour_id;
        let response = match self.lookup(tour_id).await {
            Ok(Some(tour)) => {
                info!(name = %tour.name, status = %tour.status, "Tour verified");
                VerifyTourResponse {
                    exists: true,
                    is_published: tour.status == TourStatus::Published,
                    name: tour.name,
                    price: tour.price,
                    error: String::new(),
                }
            }
            Ok(None) => VerifyTourResponse {
                error: TOUR_NOT_FOUND.into(),
                ..Default::default()
            },
            Err(message) => VerifyTourResponse {
                error: message.into(),
                ..Default::default()
            },
        };
        let outcome = match (response.exists, response.error.as_str()) {
            (true, _) => "ok",
            (false, TOUR_NOT_FOUND) => "rejected",
            _ => "error",
        };
        metrics::record_grpc_call("VerifyTourExists", outcome);
        Ok(Response::new(response))
    }

    #[instrument(skip_all, fields(user_id = request.get_ref().user_id, tour_id = request.get_ref().tour_id))]
    async fn verify_purchase_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let tour_id = request.into_inner().tour_id;
        // Token bookkeeping lives in the purchases service; only the tour is checked here.
        let response = match self.lookup(tour_id).await {
            Ok(Some(_)) => VerifyTokenResponse {
                has_token: true,
                error: String::new(),
            },
            Ok(None) => VerifyTokenResponse {
                has_token: false,
                error: TOUR_NOT_FOUND.into(),
            },
            Err(message) => VerifyTokenResponse {
                has_token: false,
                error: message.into(),
            },
        };
        let outcome = if response.has_token { "ok" } else { "rejected" };
        metrics::record_grpc_call("VerifyPurchaseToken", outcome);
        Ok(Response::new(response))
    }

    #[instrument(skip_all, fields(user_id = request.get_ref().user_id))]
    async fn reserve_tours(
        &self,
        request: Request<ReserveToursRequest>,
    ) -> Result<Response<ReserveToursResponse>, Status> {
        let ReserveToursRequest { user_id, tour_ids } = request.into_inner();
        let response = match self.unsellable(&tour_ids).await {
            None => {
                info!(user_id, tours = tour_ids.len(), "Tours reserved");
                metrics::record_grpc_call("ReserveTours", "ok");
                ReserveToursResponse {
                    success: true,
                    error: String::new(),
                }
            }
            Some(reason) => {
                warn!(user_id, reason = %reason, "Reservation refused");
                metrics::record_grpc_call("ReserveTours", "rejected");
                ReserveToursResponse {
                    success: false,
                    error: reason,
                }
            }
        };
        Ok(Response::new(response))
    }
}

/// Serve `tours.ToursService` on `addr` until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    tours: Arc<dyn TourRepository>,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    info!(%addr, "Tours gRPC server listening");
    Server::builder()
        .add_service(ToursServiceServer::new(ToursGrpcService::new(tours)))
        .serve_with_shutdown(addr, shutdown)
        .await
}
