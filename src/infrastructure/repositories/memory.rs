//! In-memory repositories.
//!
//! Non-durable implementations of the domain repository traits for tests and
//! local wiring. Each repository guards its table with a single mutex so the
//! conditional operations (`create_active`, `terminate`, `record_completion`)
//! keep the same atomicity the Postgres constraints give.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::{
    CompletedKeyPoint, KeyPoint, KeyPointRepository, Review, ReviewRepository, Termination, Tour,
    TourExecution, TourExecutionRepository, TourRepository, TourStatus, TravelTime,
    TravelTimeRepository,
};
use crate::shared::error::AppError;

#[derive(Default)]
pub struct InMemoryTourRepository {
    tours: Mutex<HashMap<i64, Tour>>,
}

impl InMemoryTourRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut tours: Vec<Tour>) -> Vec<Tour> {
        tours.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tours
    }
}

#[async_trait]
impl TourRepository for InMemoryTourRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tour>, AppError> {
        Ok(self.tours.lock().get(&id).cloned())
    }

    async fn find_by_status(&self, status: TourStatus) -> Result<Vec<Tour>, AppError> {
        let tours = self
            .tours
            .lock()
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        Ok(Self::newest_first(tours))
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Tour>, AppError> {
        let tours = self
            .tours
            .lock()
            .values()
            .filter(|t| t.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(tours))
    }

    async fn create(&self, tour: &Tour) -> Result<Tour, AppError> {
        let mut tours = self.tours.lock();
        if tours.contains_key(&tour.id) {
            return Err(AppError::Conflict("Tour already exists".into()));
        }
        tours.insert(tour.id, tour.clone());
        Ok(tour.clone())
    }

    async fn update(&self, tour: &Tour) -> Result<Tour, AppError> {
        let mut tours = self.tours.lock();
        let stored = tours
            .get_mut(&tour.id)
            .ok_or_else(|| AppError::NotFound("Tour not found".into()))?;
        let total_length_km = stored.total_length_km;
        *stored = Tour {
            total_length_km,
            updated_at: Utc::now(),
            ..tour.clone()
        };
        Ok(stored.clone())
    }

    async fn set_total_length(&self, id: i64, total_length_km: f64) -> Result<(), AppError> {
        if let Some(tour) = self.tours.lock().get_mut(&id) {
            tour.total_length_km = total_length_km;
            tour.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tours.lock().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryKeyPointRepository {
    key_points: Mutex<HashMap<i64, KeyPoint>>,
}

impl InMemoryKeyPointRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyPointRepository for InMemoryKeyPointRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<KeyPoint>, AppError> {
        let mut points: Vec<KeyPoint> = self
            .key_points
            .lock()
            .values()
            .filter(|kp| kp.tour_id == tour_id)
            .cloned()
            .collect();
        points.sort_by_key(|kp| (kp.order, kp.id));
        Ok(points)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<KeyPoint>, AppError> {
        Ok(self.key_points.lock().get(&id).cloned())
    }

    async fn find_first(&self, tour_id: i64) -> Result<Option<KeyPoint>, AppError> {
        Ok(self
            .key_points
            .lock()
            .values()
            .filter(|kp| kp.tour_id == tour_id && kp.is_first())
            .min_by_key(|kp| kp.id)
            .cloned())
    }

    async fn create(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError> {
        self.key_points.lock().insert(key_point.id, key_point.clone());
        Ok(key_point.clone())
    }

    async fn update(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError> {
        let mut key_points = self.key_points.lock();
        let stored = key_points
            .get_mut(&key_point.id)
            .ok_or_else(|| AppError::NotFound("Key point not found".into()))?;
        *stored = key_point.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.key_points.lock().remove(&id).is_some())
    }

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError> {
        let count = self
            .key_points
            .lock()
            .values()
            .filter(|kp| kp.tour_id == tour_id)
            .count();
        Ok(count as i64)
    }
}

#[derive(Default)]
pub struct InMemoryTravelTimeRepository {
    travel_times: Mutex<HashMap<i64, TravelTime>>,
}

impl InMemoryTravelTimeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TravelTimeRepository for InMemoryTravelTimeRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<TravelTime>, AppError> {
        let mut all: Vec<TravelTime> = self
            .travel_times
            .lock()
            .values()
            .filter(|tt| tt.tour_id == tour_id)
            .cloned()
            .collect();
        all.sort_by_key(|tt| tt.transport_type.as_str());
        Ok(all)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TravelTime>, AppError> {
        Ok(self.travel_times.lock().get(&id).cloned())
    }

    async fn upsert(&self, travel_time: &TravelTime) -> Result<TravelTime, AppError> {
        let mut all = self.travel_times.lock();
        let existing = all
            .values_mut()
            .find(|tt| tt.tour_id == travel_time.tour_id && tt.transport_type == travel_time.transport_type);

        if let Some(stored) = existing {
            stored.duration_min = travel_time.duration_min;
            stored.updated_at = Utc::now();
            return Ok(stored.clone());
        }
        all.insert(travel_time.id, travel_time.clone());
        Ok(travel_time.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.travel_times.lock().remove(&id).is_some())
    }

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError> {
        let count = self
            .travel_times
            .lock()
            .values()
            .filter(|tt| tt.tour_id == tour_id)
            .count();
        Ok(count as i64)
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<Review>, AppError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .iter()
            .filter(|r| r.tour_id == tour_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        self.reviews.lock().push(review.clone());
        Ok(review.clone())
    }
}

#[derive(Default)]
struct ExecutionTables {
    executions: HashMap<i64, TourExecution>,
    completions: Vec<CompletedKeyPoint>,
}

#[derive(Default)]
pub struct InMemoryTourExecutionRepository {
    tables: Mutex<ExecutionTables>,
}

impl InMemoryTourExecutionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TourExecutionRepository for InMemoryTourExecutionRepository {
    async fn create_active(&self, execution: &TourExecution) -> Result<Option<TourExecution>, AppError> {
        let mut tables = self.tables.lock();
        let has_active = tables
            .executions
            .values()
            .any(|e| e.tourist_id == execution.tourist_id && e.is_active());
        if has_active {
            return Ok(None);
        }
        tables.executions.insert(execution.id, execution.clone());
        Ok(Some(execution.clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TourExecution>, AppError> {
        Ok(self.tables.lock().executions.get(&id).cloned())
    }

    async fn find_active_by_tourist(&self, tourist_id: i64) -> Result<Option<TourExecution>, AppError> {
        Ok(self
            .tables
            .lock()
            .executions
            .values()
            .filter(|e| e.tourist_id == tourist_id && e.is_active())
            .max_by_key(|e| (e.created_at, e.id))
            .cloned())
    }

    async fn touch_active(
        &self,
        id: i64,
        tourist_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError> {
        let mut tables = self.tables.lock();
        match tables.executions.get_mut(&id) {
            Some(e) if e.tourist_id == tourist_id && e.is_active() => {
                e.last_activity = at;
                e.updated_at = at;
                Ok(Some(e.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn terminate(
        &self,
        id: i64,
        how: Termination,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError> {
        let mut tables = self.tables.lock();
        match tables.executions.get_mut(&id) {
            Some(e) => {
                if e.terminate(how, at) {
                    Ok(Some(e.clone()))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    async fn record_completion(&self, completion: &CompletedKeyPoint) -> Result<bool, AppError> {
        let mut tables = self.tables.lock();
        let exists = tables.completions.iter().any(|c| {
            c.execution_id == completion.execution_id && c.key_point_id == completion.key_point_id
        });
        if exists {
            return Ok(false);
        }
        tables.completions.push(completion.clone());
        Ok(true)
    }

    async fn find_completions(&self, execution_id: i64) -> Result<Vec<CompletedKeyPoint>, AppError> {
        let mut completions: Vec<CompletedKeyPoint> = self
            .tables
            .lock()
            .completions
            .iter()
            .filter(|c| c.execution_id == execution_id)
            .cloned()
            .collect();
        completions.sort_by_key(|c| (c.completed_at, c.id));
        Ok(completions)
    }

    async fn tour_has_executions(&self, tour_id: i64) -> Result<bool, AppError> {
        Ok(self.tables.lock().executions.values().any(|e| e.tour_id == tour_id))
    }

    async fn key_point_has_completions(&self, key_point_id: i64) -> Result<bool, AppError> {
        Ok(self
            .tables
            .lock()
            .completions
            .iter()
            .any(|c| c.key_point_id == key_point_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn execution(id: i64, tourist_id: i64) -> TourExecution {
        TourExecution::start(id, 7, tourist_id, Coordinates::new(45.0, 19.0), Utc::now())
    }

    #[tokio::test]
    async fn test_single_active_execution_per_tourist() {
        let repo = InMemoryTourExecutionRepository::new();
        assert!(repo.create_active(&execution(1, 42)).await.unwrap().is_some());
        assert!(repo.create_active(&execution(2, 42)).await.unwrap().is_none());
        assert!(repo.create_active(&execution(3, 43)).await.unwrap().is_some());

        repo.terminate(1, Termination::Abandoned, Utc::now()).await.unwrap();
        assert!(repo.create_active(&execution(4, 42)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_touch_requires_owner_and_active() {
        let repo = InMemoryTourExecutionRepository::new();
        repo.create_active(&execution(1, 42)).await.unwrap();

        assert!(repo.touch_active(1, 99, Utc::now()).await.unwrap().is_none());
        assert!(repo.touch_active(1, 42, Utc::now()).await.unwrap().is_some());

        repo.terminate(1, Termination::Completed, Utc::now()).await.unwrap();
        assert!(repo.touch_active(1, 42, Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_completion_is_idempotent() {
        let repo = InMemoryTourExecutionRepository::new();
        let now = Utc::now();
        let completion = CompletedKeyPoint {
            id: 10,
            execution_id: 1,
            key_point_id: 5,
            completed_at: now,
            created_at: now,
        };
        assert!(repo.record_completion(&completion).await.unwrap());
        assert!(!repo
            .record_completion(&CompletedKeyPoint { id: 11, ..completion })
            .await
            .unwrap());
        assert_eq!(repo.find_completions(1).await.unwrap().len(), 1);
        assert!(repo.key_point_has_completions(5).await.unwrap());
        assert!(!repo.key_point_has_completions(6).await.unwrap());
    }

    #[tokio::test]
    async fn test_finished_executions_still_reference_tour() {
        let repo = InMemoryTourExecutionRepository::new();
        assert!(!repo.tour_has_executions(7).await.unwrap());

        repo.create_active(&execution(1, 42)).await.unwrap();
        repo.terminate(1, Termination::Abandoned, Utc::now()).await.unwrap();
        assert!(repo.tour_has_executions(7).await.unwrap());
        assert!(!repo.tour_has_executions(8).await.unwrap());
    }
}
