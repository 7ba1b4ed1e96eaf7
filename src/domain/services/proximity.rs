//! Geofence matching of a reported position against a tour's key points.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::KeyPoint;
use crate::domain::value_objects::Coordinates;

/// How distance to a key point is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityMetric {
    /// Squared Euclidean distance in degree space against a degree threshold.
    Degrees,
    /// Great-circle distance against a radius in meters.
    Haversine,
}

/// Which key point wins when several are in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The first uncompleted key point in stored order.
    FirstInOrder,
    /// The closest uncompleted key point; ties go to stored order.
    Nearest,
}

/// A geofence test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRule {
    metric: ProximityMetric,
    threshold_deg: f64,
    radius_m: f64,
}

impl ProximityRule {
    /// Degree-space rule: `dLat² + dLon² < threshold²`.
    pub fn degrees(threshold_deg: f64) -> Self {
        Self {
            metric: ProximityMetric::Degrees,
            threshold_deg,
            radius_m: 0.0,
        }
    }

    /// Geodesic rule: Haversine distance below `radius_m` meters.
    pub fn haversine(radius_m: f64) -> Self {
        Self {
            metric: ProximityMetric::Haversine,
            threshold_deg: 0.0,
            radius_m,
        }
    }

    pub fn metric(&self) -> ProximityMetric {
        self.metric
    }

    /// Distance in the rule's own unit (squared degrees or meters).
    fn measure(&self, a: &Coordinates, b: &Coordinates) -> f64 {
        match self.metric {
            ProximityMetric::Degrees => a.squared_degree_distance(b),
            ProximityMetric::Haversine => a.distance_km(b) * 1000.0,
        }
    }

    fn limit(&self) -> f64 {
        match self.metric {
            ProximityMetric::Degrees => self.threshold_deg * self.threshold_deg,
            ProximityMetric::Haversine => self.radius_m,
        }
    }

    /// Strictly inside the geofence.
    pub fn is_within(&self, position: &Coordinates, target: &Coordinates) -> bool {
        self.measure(position, target) < self.limit()
    }
}

/// Picks the key point a position completes, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPointMatcher {
    rule: ProximityRule,
    strategy: MatchStrategy,
}

impl KeyPointMatcher {
    pub fn new(rule: ProximityRule, strategy: MatchStrategy) -> Self {
        Self { rule, strategy }
    }

    pub fn rule(&self) -> &ProximityRule {
        &self.rule
    }

    /// Scan `key_points` in the given order, skipping `completed` ids.
    pub fn find_match<'a>(
        &self,
        position: &Coordinates,
        key_points: &'a [KeyPoint],
        completed: &HashSet<i64>,
    ) -> Option<&'a KeyPoint> {
        let mut candidates = key_points
            .iter()
            .filter(|kp| !completed.contains(&kp.id))
            .map(|kp| (kp, self.rule.measure(position, &kp.coordinates())))
            .filter(|(_, distance)| *distance < self.rule.limit());

        match self.strategy {
            MatchStrategy::FirstInOrder => candidates.next().map(|(kp, _)| kp),
            MatchStrategy::Nearest => candidates
                .fold(None::<(&KeyPoint, f64)>, |best, (kp, distance)| match best {
                    Some((_, best_distance)) if best_distance <= distance => best,
                    _ => Some((kp, distance)),
                })
                .map(|(kp, _)| kp),
        }
    }
}

impl Default for KeyPointMatcher {
    fn default() -> Self {
        Self::new(ProximityRule::degrees(0.0005), MatchStrategy::FirstInOrder)
    }
}
