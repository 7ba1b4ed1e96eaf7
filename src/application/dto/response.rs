//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{ActiveExecutionView, LocationUpdate, StartedExecution, TourSummary};
use crate::domain::{CompletedKeyPoint, KeyPoint, Tour, TourExecution};

/// Body of `POST /tours/{id}/start`
#[derive(Debug, Serialize)]
pub struct StartExecutionResponse {
    pub execution: TourExecution,
    pub purchase_token: String,
}

impl From<StartedExecution> for StartExecutionResponse {
    fn from(started: StartedExecution) -> Self {
        Self {
            execution: started.execution,
            purchase_token: started.entitlement.token_id,
        }
    }
}

/// Body of `GET /executions/active`
#[derive(Debug, Serialize)]
pub struct ActiveExecutionResponse {
    pub execution: TourExecution,
    pub tour: Tour,
    pub keypoints: Vec<KeyPoint>,
    pub completed_keypoints: Vec<CompletedKeyPoint>,
}

impl From<ActiveExecutionView> for ActiveExecutionResponse {
    fn from(view: ActiveExecutionView) -> Self {
        Self {
            execution: view.execution,
            tour: view.tour,
            keypoints: view.key_points,
            completed_keypoints: view.completions,
        }
    }
}

/// Body of `PUT /executions/{id}/location`
#[derive(Debug, Serialize)]
pub struct LocationUpdateResponse {
    pub nearby_keypoint: Option<KeyPoint>,
    /// True when this ping recorded a new completion
    pub completed: bool,
}

impl From<LocationUpdate> for LocationUpdateResponse {
    fn from(update: LocationUpdate) -> Self {
        Self {
            nearby_keypoint: update.key_point,
            completed: update.newly_completed,
        }
    }
}

/// Body of `GET /executions/{id}/keypoints`
#[derive(Debug, Serialize)]
pub struct CompletedKeyPointsResponse {
    pub completed_keypoints: Vec<CompletedKeyPoint>,
}

/// Result of a terminal transition or a manual key-point completion
#[derive(Debug, Serialize)]
pub struct ExecutionMessageResponse {
    pub message: String,
    pub execution: TourExecution,
}

/// Body of `POST /executions/{id}/keypoints/{keypoint_id}/complete`
#[derive(Debug, Serialize)]
pub struct KeyPointCompletionResponse {
    pub message: String,
    pub keypoint: KeyPoint,
    pub completed: bool,
}

/// Tour listing entry for tourists, with the tour's entry point
#[derive(Debug, Serialize)]
pub struct TourForTouristResponse {
    #[serde(flatten)]
    pub tour: Tour,
    pub first_keypoint: Option<KeyPoint>,
}

impl From<TourSummary> for TourForTouristResponse {
    fn from(summary: TourSummary) -> Self {
        Self {
            tour: summary.tour,
            first_keypoint: summary.first_key_point,
        }
    }
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
