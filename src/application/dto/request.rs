//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::domain::{Coordinates, TransportType};

/// Position report, used both to start a tour and for location pings
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

impl LocationRequest {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Create tour request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTourRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1, max = 3, message = "Difficulty must be 1 (easy), 2 (medium) or 3 (hard)"))]
    pub difficulty: i16,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial tour update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTourRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 3, message = "Difficulty must be 1 (easy), 2 (medium) or 3 (hard)"))]
    pub difficulty: Option<i16>,

    pub tags: Option<Vec<String>>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
}

/// Create key point request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKeyPointRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    pub image_url: Option<String>,

    #[validate(range(min = 1, message = "Order must be positive"))]
    pub order: i32,
}

/// Partial key point update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateKeyPointRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    /// Absent keeps the image, `null` removes it.
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,

    #[validate(range(min = 1, message = "Order must be positive"))]
    pub order: Option<i32>,
}

/// Marks a field that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Travel time upsert request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTravelTimeRequest {
    pub transport_type: TransportType,

    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration_min: i32,
}

/// Create review request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,

    /// `YYYY-MM-DD`
    pub visit_date: NaiveDate,

    #[serde(default)]
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_bounds() {
        assert!(LocationRequest { latitude: 45.0, longitude: 19.0 }.validate().is_ok());
        assert!(LocationRequest { latitude: 91.0, longitude: 19.0 }.validate().is_err());
        assert!(LocationRequest { latitude: 0.0, longitude: -181.0 }.validate().is_err());
    }

    #[test]
    fn test_review_rating_bounds() {
        let body: CreateReviewRequest = serde_json::from_str(
            r#"{"rating": 6, "comment": "great", "visit_date": "2024-05-01"}"#,
        )
        .unwrap();
        assert!(body.validate().is_err());
        assert!(body.images.is_empty());
    }

    #[test]
    fn test_travel_time_rejects_unknown_transport() {
        let parsed = serde_json::from_str::<CreateTravelTimeRequest>(
            r#"{"transport_type": "boat", "duration_min": 30}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_travel_time_requires_positive_duration() {
        let body: CreateTravelTimeRequest =
            serde_json::from_str(r#"{"transport_type": "car", "duration_min": 0}"#).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_key_point_image_absent_null_or_set() {
        let absent: UpdateKeyPointRequest = serde_json::from_str(r#"{"name": "Gate"}"#).unwrap();
        assert_eq!(absent.image_url, None);

        let cleared: UpdateKeyPointRequest = serde_json::from_str(r#"{"image_url": null}"#).unwrap();
        assert_eq!(cleared.image_url, Some(None));

        let set: UpdateKeyPointRequest =
            serde_json::from_str(r#"{"image_url": "https://img/1.jpg"}"#).unwrap();
        assert_eq!(set.image_url, Some(Some("https://img/1.jpg".to_string())));
    }
}
