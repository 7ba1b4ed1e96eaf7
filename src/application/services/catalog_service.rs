//! Catalog Service
//!
//! Tours, key points and travel-time estimates, with the guide-owned
//! authoring rules and the publish/archive lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use crate::application::dto::request::{
    CreateKeyPointRequest, CreateTourRequest, CreateTravelTimeRequest, UpdateKeyPointRequest,
    UpdateTourRequest,
};
use crate::domain::{
    route_length_km, KeyPoint, KeyPointRepository, Principal, Tour, TourExecutionRepository,
    TourRepository, TourStatus, TravelTime, TravelTimeRepository, MIN_KEY_POINTS_TO_PUBLISH,
    MIN_TRAVEL_TIMES_TO_PUBLISH,
};
use crate::infrastructure::repositories::Repositories;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Catalog service trait defining tour authoring and browsing operations.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Published tours, newest first.
    async fn list_published(&self) -> Result<Vec<Tour>, CatalogError>;

    async fn list_by_status(&self, status: TourStatus) -> Result<Vec<Tour>, CatalogError>;

    /// Published tours paired with their entry key point.
    async fn tours_for_tourists(&self) -> Result<Vec<TourSummary>, CatalogError>;

    async fn get_tour(&self, tour_id: i64) -> Result<Tour, CatalogError>;

    /// Tours authored by the caller.
    async fn my_tours(&self, author: &Principal) -> Result<Vec<Tour>, CatalogError>;

    async fn create_tour(&self, author: &Principal, request: CreateTourRequest) -> Result<Tour, CatalogError>;

    async fn update_tour(
        &self,
        author: &Principal,
        tour_id: i64,
        request: UpdateTourRequest,
    ) -> Result<Tour, CatalogError>;

    async fn delete_tour(&self, author: &Principal, tour_id: i64) -> Result<(), CatalogError>;

    async fn publish_tour(&self, author: &Principal, tour_id: i64) -> Result<Tour, CatalogError>;

    async fn archive_tour(&self, author: &Principal, tour_id: i64) -> Result<Tour, CatalogError>;

    async fn key_points(&self, tour_id: i64) -> Result<Vec<KeyPoint>, CatalogError>;

    async fn first_key_point(&self, tour_id: i64) -> Result<KeyPoint, CatalogError>;

    async fn add_key_point(
        &self,
        author: &Principal,
        tour_id: i64,
        request: CreateKeyPointRequest,
    ) -> Result<KeyPoint, CatalogError>;

    async fn update_key_point(
        &self,
        author: &Principal,
        tour_id: i64,
        key_point_id: i64,
        request: UpdateKeyPointRequest,
    ) -> Result<KeyPoint, CatalogError>;

    async fn delete_key_point(&self, author: &Principal, tour_id: i64, key_point_id: i64) -> Result<(), CatalogError>;

    async fn travel_times(&self, tour_id: i64) -> Result<Vec<TravelTime>, CatalogError>;

    /// Create or replace the estimate for a transport type.
    async fn upsert_travel_time(
        &self,
        author: &Principal,
        tour_id: i64,
        request: CreateTravelTimeRequest,
    ) -> Result<TravelTime, CatalogError>;

    async fn delete_travel_time(&self, author: &Principal, tour_id: i64, travel_time_id: i64) -> Result<(), CatalogError>;
}

/// A tour and its first key point, for tourist-facing listings.
#[derive(Debug, Clone)]
pub struct TourSummary {
    pub tour: Tour,
    pub first_key_point: Option<KeyPoint>,
}

/// Catalog service errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Tour not found")]
    TourNotFound,

    #[error("Key point not found")]
    KeyPointNotFound,

    #[error("Travel time not found")]
    TravelTimeNotFound,

    #[error("Only the author can modify this tour")]
    NotAuthor,

    #[error(
        "Tour must have at least {} key points and {} travel time before publishing",
        MIN_KEY_POINTS_TO_PUBLISH,
        MIN_TRAVEL_TIMES_TO_PUBLISH
    )]
    CannotPublish,

    #[error("Only published tours can be archived")]
    CannotArchive,

    #[error("Tour has executions and cannot be deleted")]
    TourInUse,

    #[error("Key point has been completed by a tourist and cannot be deleted")]
    KeyPointInUse,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::TourNotFound
            | CatalogError::KeyPointNotFound
            | CatalogError::TravelTimeNotFound => AppError::NotFound(message),
            CatalogError::NotAuthor => AppError::Forbidden(message),
            CatalogError::CannotPublish | CatalogError::CannotArchive => AppError::BadRequest(message),
            CatalogError::TourInUse | CatalogError::KeyPointInUse => AppError::Conflict(message),
            CatalogError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Catalog service implementation.
pub struct CatalogServiceImpl {
    tours: Arc<dyn TourRepository>,
    key_points: Arc<dyn KeyPointRepository>,
    travel_times: Arc<dyn TravelTimeRepository>,
    executions: Arc<dyn TourExecutionRepository>,
    snowflake: Arc<SnowflakeGenerator>,
}

impl CatalogServiceImpl {
    pub fn new(repos: &Repositories, snowflake: Arc<SnowflakeGenerator>) -> Self {
        Self {
            tours: repos.tours.clone(),
            key_points: repos.key_points.clone(),
            travel_times: repos.travel_times.clone(),
            executions: repos.executions.clone(),
            snowflake,
        }
    }

    async fn find_tour(&self, tour_id: i64) -> Result<Tour, CatalogError> {
        self.tours
            .find_by_id(tour_id)
            .await?
            .ok_or(CatalogError::TourNotFound)
    }

    /// Load a tour and check the caller wrote it.
    async fn authored_tour(&self, author: &Principal, tour_id: i64) -> Result<Tour, CatalogError> {
        let tour = self.find_tour(tour_id).await?;
        if !tour.is_authored_by(author.user_id.value()) {
            return Err(CatalogError::NotAuthor);
        }
        Ok(tour)
    }

    async fn key_point_of(&self, tour_id: i64, key_point_id: i64) -> Result<KeyPoint, CatalogError> {
        match self.key_points.find_by_id(key_point_id).await? {
            Some(kp) if kp.tour_id == tour_id => Ok(kp),
            _ => Err(CatalogError::KeyPointNotFound),
        }
    }

    /// Recompute and store the route length from the current key points.
    async fn refresh_length(&self, tour_id: i64) -> Result<f64, CatalogError> {
        let points: Vec<_> = self
            .key_points
            .find_by_tour(tour_id)
            .await?
            .iter()
            .map(KeyPoint::coordinates)
            .collect();
        let length = route_length_km(&points);
        self.tours.set_total_length(tour_id, length).await?;
        Ok(length)
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn list_published(&self) -> Result<Vec<Tour>, CatalogError> {
        Ok(self.tours.find_by_status(TourStatus::Published).await?)
    }

    async fn list_by_status(&self, status: TourStatus) -> Result<Vec<Tour>, CatalogError> {
        Ok(self.tours.find_by_status(status).await?)
    }

    async fn tours_for_tourists(&self) -> Result<Vec<TourSummary>, CatalogError> {
        let tours = self.tours.find_by_status(TourStatus::Published).await?;
        let mut summaries = Vec::with_capacity(tours.len());
        for tour in tours {
            let first_key_point = self.key_points.find_first(tour.id).await?;
            summaries.push(TourSummary {
                tour,
                first_key_point,
            });
        }
        Ok(summaries)
    }

    async fn get_tour(&self, tour_id: i64) -> Result<Tour, CatalogError> {
        self.find_tour(tour_id).await
    }

    async fn my_tours(&self, author: &Principal) -> Result<Vec<Tour>, CatalogError> {
        Ok(self.tours.find_by_author(author.user_id.value()).await?)
    }

    #[instrument(skip(self, author, request), fields(author_id = %author.user_id))]
    async fn create_tour(&self, author: &Principal, request: CreateTourRequest) -> Result<Tour, CatalogError> {
        let tour = Tour::new_draft(
            self.snowflake.generate(),
            author.user_id.value(),
            request.name,
            request.description,
            request.difficulty,
            request.tags,
        );
        let created = self.tours.create(&tour).await?;
        info!(tour_id = created.id, "Tour created");
        Ok(created)
    }

    async fn update_tour(
        &self,
        author: &Principal,
        tour_id: i64,
        request: UpdateTourRequest,
    ) -> Result<Tour, CatalogError> {
        let mut tour = self.authored_tour(author, tour_id).await?;

        if let Some(name) = request.name {
            tour.name = name;
        }
        if let Some(description) = request.description {
            tour.description = description;
        }
        if let Some(difficulty) = request.difficulty {
            tour.difficulty = difficulty;
        }
        if let Some(tags) = request.tags {
            tour.tags = tags;
        }
        if let Some(price) = request.price {
            tour.price = price;
        }
        tour.updated_at = Utc::now();

        Ok(self.tours.update(&tour).await?)
    }

    #[instrument(skip(self, author), fields(author_id = %author.user_id))]
    async fn delete_tour(&self, author: &Principal, tour_id: i64) -> Result<(), CatalogError> {
        self.authored_tour(author, tour_id).await?;
        // Execution history outlives catalog edits.
        if self.executions.tour_has_executions(tour_id).await? {
            return Err(CatalogError::TourInUse);
        }
        if !self.tours.delete(tour_id).await? {
            return Err(CatalogError::TourNotFound);
        }
        info!("Tour deleted");
        Ok(())
    }

    #[instrument(skip(self, author), fields(author_id = %author.user_id))]
    async fn publish_tour(&self, author: &Principal, tour_id: i64) -> Result<Tour, CatalogError> {
        let mut tour = self.authored_tour(author, tour_id).await?;

        let key_points = self.key_points.count_by_tour(tour_id).await?;
        let travel_times = self.travel_times.count_by_tour(tour_id).await?;
        if !Tour::can_publish(key_points, travel_times) {
            return Err(CatalogError::CannotPublish);
        }

        tour.publish(Utc::now());
        let published = self.tours.update(&tour).await?;
        info!("Tour published");
        Ok(published)
    }

    #[instrument(skip(self, author), fields(author_id = %author.user_id))]
    async fn archive_tour(&self, author: &Principal, tour_id: i64) -> Result<Tour, CatalogError> {
        let mut tour = self.authored_tour(author, tour_id).await?;
        if !tour.archive(Utc::now()) {
            return Err(CatalogError::CannotArchive);
        }
        let archived = self.tours.update(&tour).await?;
        info!("Tour archived");
        Ok(archived)
    }

    async fn key_points(&self, tour_id: i64) -> Result<Vec<KeyPoint>, CatalogError> {
        self.find_tour(tour_id).await?;
        Ok(self.key_points.find_by_tour(tour_id).await?)
    }

    async fn first_key_point(&self, tour_id: i64) -> Result<KeyPoint, CatalogError> {
        self.key_points
            .find_first(tour_id)
            .await?
            .ok_or(CatalogError::KeyPointNotFound)
    }

    async fn add_key_point(
        &self,
        author: &Principal,
        tour_id: i64,
        request: CreateKeyPointRequest,
    ) -> Result<KeyPoint, CatalogError> {
        self.authored_tour(author, tour_id).await?;

        let now = Utc::now();
        let key_point = KeyPoint {
            id: self.snowflake.generate(),
            tour_id,
            name: request.name,
            description: request.description,
            latitude: request.latitude,
            longitude: request.longitude,
            image_url: request.image_url,
            order: request.order,
            created_at: now,
            updated_at: now,
        };
        let created = self.key_points.create(&key_point).await?;
        self.refresh_length(tour_id).await?;
        Ok(created)
    }

    async fn update_key_point(
        &self,
        author: &Principal,
        tour_id: i64,
        key_point_id: i64,
        request: UpdateKeyPointRequest,
    ) -> Result<KeyPoint, CatalogError> {
        self.authored_tour(author, tour_id).await?;
        let mut key_point = self.key_point_of(tour_id, key_point_id).await?;

        if let Some(name) = request.name {
            key_point.name = name;
        }
        if let Some(description) = request.description {
            key_point.description = description;
        }
        if let Some(latitude) = request.latitude {
            key_point.latitude = latitude;
        }
        if let Some(longitude) = request.longitude {
            key_point.longitude = longitude;
        }
        if let Some(image_url) = request.image_url {
            key_point.image_url = image_url;
        }
        if let Some(order) = request.order {
            key_point.order = order;
        }
        key_point.updated_at = Utc::now();

        let updated = self.key_points.update(&key_point).await?;
        self.refresh_length(tour_id).await?;
        Ok(updated)
    }

    async fn delete_key_point(&self, author: &Principal, tour_id: i64, key_point_id: i64) -> Result<(), CatalogError> {
        self.authored_tour(author, tour_id).await?;
        self.key_point_of(tour_id, key_point_id).await?;
        if self.executions.key_point_has_completions(key_point_id).await? {
            return Err(CatalogError::KeyPointInUse);
        }

        self.key_points.delete(key_point_id).await?;
        self.refresh_length(tour_id).await?;
        Ok(())
    }

    async fn travel_times(&self, tour_id: i64) -> Result<Vec<TravelTime>, CatalogError> {
        self.find_tour(tour_id).await?;
        Ok(self.travel_times.find_by_tour(tour_id).await?)
    }

    async fn upsert_travel_time(
        &self,
        author: &Principal,
        tour_id: i64,
        request: CreateTravelTimeRequest,
    ) -> Result<TravelTime, CatalogError> {
        self.authored_tour(author, tour_id).await?;

        let now = Utc::now();
        let travel_time = TravelTime {
            id: self.snowflake.generate(),
            tour_id,
            transport_type: request.transport_type,
            duration_min: request.duration_min,
            created_at: now,
            updated_at: now,
        };
        Ok(self.travel_times.upsert(&travel_time).await?)
    }

    async fn delete_travel_time(&self, author: &Principal, tour_id: i64, travel_time_id: i64) -> Result<(), CatalogError> {
        self.authored_tour(author, tour_id).await?;
        match self.travel_times.find_by_id(travel_time_id).await? {
            Some(tt) if tt.tour_id == tour_id => {
                self.travel_times.delete(travel_time_id).await?;
                Ok(())
            }
            _ => Err(CatalogError::TravelTimeNotFound),
        }
    }
}
