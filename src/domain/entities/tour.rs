//! Tour entity and repository trait.
//!
//! Maps to the `tours` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Publication lifecycle of a tour.
///
/// Database definition:
/// ```sql
/// status VARCHAR(20) NOT NULL DEFAULT 'draft'
///     CHECK (status IN ('draft', 'published', 'archived'))
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl TourStatus {
    /// Parse from the database / path representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for TourStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum number of key points a tour needs before it can be published.
pub const MIN_KEY_POINTS_TO_PUBLISH: i64 = 2;

/// Minimum number of travel-time estimates a tour needs before publishing.
pub const MIN_TRAVEL_TIMES_TO_PUBLISH: i64 = 1;

/// A guided tour authored by a guide.
///
/// Maps to the `tours` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(255) NOT NULL
/// - description: TEXT NOT NULL
/// - difficulty: SMALLINT NOT NULL (1 = easy, 2 = medium, 3 = hard)
/// - tags: TEXT[] NOT NULL
/// - price: DOUBLE PRECISION NOT NULL DEFAULT 0
/// - status: VARCHAR(20) NOT NULL DEFAULT 'draft'
/// - total_length_km: DOUBLE PRECISION NOT NULL DEFAULT 0
/// - author_id: BIGINT NOT NULL
/// - published_at / archived_at: TIMESTAMPTZ NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tour {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub difficulty: i16,
    pub tags: Vec<String>,
    pub price: f64,
    pub status: TourStatus,
    pub total_length_km: f64,
    pub author_id: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// A fresh draft with no price and no length.
    pub fn new_draft(
        id: i64,
        author_id: i64,
        name: String,
        description: String,
        difficulty: i16,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            difficulty,
            tags,
            price: 0.0,
            status: TourStatus::Draft,
            total_length_km: 0.0,
            author_id,
            published_at: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// Whether a tourist may start an execution of this tour.
    pub fn is_startable(&self, allow_archived: bool) -> bool {
        match self.status {
            TourStatus::Published => true,
            TourStatus::Archived => allow_archived,
            TourStatus::Draft => false,
        }
    }

    /// Publication requires enough key points and at least one travel time.
    pub fn can_publish(key_points: i64, travel_times: i64) -> bool {
        key_points >= MIN_KEY_POINTS_TO_PUBLISH && travel_times >= MIN_TRAVEL_TIMES_TO_PUBLISH
    }

    /// Move to published. The first publication timestamp is kept.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = TourStatus::Published;
        self.published_at.get_or_insert(now);
        self.archived_at = None;
        self.updated_at = now;
    }

    /// Move a published tour to archived. Returns false for any other status.
    pub fn archive(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != TourStatus::Published {
            return false;
        }
        self.status = TourStatus::Archived;
        self.archived_at = Some(now);
        self.updated_at = now;
        true
    }
}

/// Repository trait for Tour data access operations.
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Find a tour by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Tour>, AppError>;

    /// All tours with the given status, newest first.
    async fn find_by_status(&self, status: TourStatus) -> Result<Vec<Tour>, AppError>;

    /// All tours written by an author, newest first.
    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Tour>, AppError>;

    /// Insert a new tour.
    async fn create(&self, tour: &Tour) -> Result<Tour, AppError>;

    /// Persist all mutable columns of an existing tour.
    async fn update(&self, tour: &Tour) -> Result<Tour, AppError>;

    /// Overwrite the cached route length.
    async fn set_total_length(&self, id: i64, total_length_km: f64) -> Result<(), AppError>;

    /// Delete a tour. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Tour {
        Tour::new_draft(1, 10, "Fortress".into(), "Walk".into(), 2, vec!["history".into()])
    }

    #[test]
    fn test_new_draft_defaults() {
        let tour = draft();
        assert_eq!(tour.status, TourStatus::Draft);
        assert_eq!(tour.price, 0.0);
        assert!(tour.published_at.is_none());
    }

    #[test]
    fn test_startable() {
        let mut tour = draft();
        assert!(!tour.is_startable(true));
        tour.publish(Utc::now());
        assert!(tour.is_startable(false));
        assert!(tour.archive(Utc::now()));
        assert!(!tour.is_startable(false));
        assert!(tour.is_startable(true));
    }

    #[test]
    fn test_publish_keeps_first_timestamp() {
        let mut tour = draft();
        let first = Utc::now() - chrono::Duration::days(3);
        tour.publish(first);
        tour.archive(Utc::now());
        tour.publish(Utc::now());
        assert_eq!(tour.published_at, Some(first));
        assert!(tour.archived_at.is_none());
    }

    #[test]
    fn test_archive_requires_published() {
        let mut tour = draft();
        assert!(!tour.archive(Utc::now()));
        assert_eq!(tour.status, TourStatus::Draft);
    }

    #[test]
    fn test_can_publish() {
        assert!(!Tour::can_publish(1, 1));
        assert!(!Tour::can_publish(2, 0));
        assert!(Tour::can_publish(2, 1));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TourStatus::parse("Published"), Some(TourStatus::Published));
        assert_eq!(TourStatus::parse("deleted"), None);
    }
}
