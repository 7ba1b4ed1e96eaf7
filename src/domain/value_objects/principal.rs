//! Authenticated caller identity.

use serde::{Deserialize, Serialize};

/// Platform-wide user identifier.
///
/// Tokens from the identity service carry `sub` as either a JSON number or a
/// numeric string; the access gate normalizes both into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(UserId)
    }
}

/// Platform roles as stored by the stakeholders service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "vodic")]
    Guide,
    #[serde(rename = "turista")]
    Tourist,
}

impl Role {
    /// Parse a role name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "vodic" => Some(Self::Guide),
            "turista" => Some(Self::Tourist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Guide => "vodic",
            Self::Tourist => "turista",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified caller, as handed to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl Principal {
    pub fn new(user_id: UserId, role: Option<Role>) -> Self {
        Self {
            user_id,
            role,
            username: None,
        }
    }

    pub fn is_guide(&self) -> bool {
        self.role == Some(Role::Guide)
    }
}
