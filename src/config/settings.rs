//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::services::proximity::{
    KeyPointMatcher, MatchStrategy, ProximityMetric, ProximityRule,
};

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Optional stakeholders database used to resolve roles missing from tokens
    #[serde(default)]
    pub stakeholders: Option<StakeholdersSettings>,

    /// Redis configuration
    pub redis: RedisSettings,

    /// JWT verification settings
    pub jwt: JwtSettings,

    /// Purchases service (gRPC) client settings
    pub purchases: PurchasesSettings,

    /// Tours gRPC server binding
    pub grpc: GrpcServerSettings,

    /// Tour execution engine tuning
    pub execution: ExecutionSettings,

    /// Access gate settings
    pub access: AccessSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Tours gRPC server binding.
#[derive(Debug, Clone, Deserialize)]
pub struct GrpcServerSettings {
    pub host: String,

    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Stakeholders database (read-only role lookups).
#[derive(Debug, Clone, Deserialize)]
pub struct StakeholdersSettings {
    pub url: String,

    #[serde(default = "default_stakeholders_connections")]
    pub max_connections: u32,
}

fn default_stakeholders_connections() -> u32 {
    3
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL
    pub url: String,
}

/// JWT verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Shared HS256 secret
    pub secret: String,
}

/// Purchases service client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchasesSettings {
    /// gRPC endpoint, e.g. `http://purchases-service:50051`
    pub addr: String,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
}

impl PurchasesSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Execution engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSettings {
    /// `degrees` (squared Euclidean in degree space) or `haversine`
    pub proximity_metric: ProximityMetric,

    /// Threshold for the `degrees` metric
    pub proximity_threshold_deg: f64,

    /// Radius in meters for the `haversine` metric
    pub proximity_radius_m: f64,

    /// `first_in_order` or `nearest`
    pub match_strategy: MatchStrategy,

    /// Accept archived tours at start
    pub allow_archived_start: bool,
}

impl ExecutionSettings {
    /// Build the geofence matcher these settings describe.
    pub fn matcher(&self) -> KeyPointMatcher {
        let rule = match self.proximity_metric {
            ProximityMetric::Degrees => ProximityRule::degrees(self.proximity_threshold_deg),
            ProximityMetric::Haversine => ProximityRule::haversine(self.proximity_radius_m),
        };
        KeyPointMatcher::new(rule, self.match_strategy)
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            proximity_metric: ProximityMetric::Degrees,
            proximity_threshold_deg: 0.0005,
            proximity_radius_m: 50.0,
            match_strategy: MatchStrategy::FirstInOrder,
            allow_archived_start: false,
        }
    }
}

/// Access gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSettings {
    /// How long a role resolved from the stakeholders database stays cached
    pub role_cache_ttl_secs: u64,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine ID (0-31)
    pub machine_id: u64,

    /// Node ID (0-31)
    pub node_id: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("purchases.addr", "http://localhost:50051")?
            .set_default("purchases.connect_timeout_secs", 10)?
            .set_default("purchases.request_timeout_secs", 10)?
            .set_default("grpc.host", "0.0.0.0")?
            .set_default("grpc.port", 50052)?
            .set_default("execution.proximity_metric", "degrees")?
            .set_default("execution.proximity_threshold_deg", 0.0005)?
            .set_default("execution.proximity_radius_m", 50.0)?
            .set_default("execution.match_strategy", "first_in_order")?
            .set_default("execution.allow_archived_start", false)?
            .set_default("access.role_cache_ttl_secs", 300)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.node_id", 1)?
            .set_default("cors.allowed_origins", vec!["http://localhost:4200"])?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=8082 -> server.port = 8082
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option(
                "purchases.addr",
                std::env::var("PURCHASES_GRPC_ADDR").ok(),
            )?
            .set_override_option("grpc.port", std::env::var("GRPC_PORT").ok())?
            .set_override_option(
                "stakeholders.url",
                std::env::var("STAKEHOLDERS_DATABASE_URL").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters for security. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        if self.execution.proximity_threshold_deg <= 0.0 || self.execution.proximity_radius_m <= 0.0 {
            return Err(ConfigError::Message(
                "Proximity threshold and radius must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Address the tours gRPC server listens on.
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.grpc.host, self.grpc.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 8082,
            },
            database: DatabaseSettings {
                url: "postgres://localhost/tours".into(),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout: 5,
            },
            stakeholders: None,
            redis: RedisSettings {
                url: "redis://localhost:6379".into(),
            },
            jwt: JwtSettings {
                secret: "x".repeat(MIN_JWT_SECRET_LENGTH),
            },
            purchases: PurchasesSettings {
                addr: "http://localhost:50051".into(),
                connect_timeout_secs: 10,
                request_timeout_secs: 10,
            },
            grpc: GrpcServerSettings {
                host: "0.0.0.0".into(),
                port: 50052,
            },
            execution: ExecutionSettings::default(),
            access: AccessSettings {
                role_cache_ttl_secs: 300,
            },
            snowflake: SnowflakeSettings {
                machine_id: 1,
                node_id: 1,
            },
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            environment: "test".into(),
        }
    }

    #[test]
    fn test_execution_defaults_match_legacy_behavior() {
        let exec = ExecutionSettings::default();
        assert_eq!(exec.proximity_metric, ProximityMetric::Degrees);
        assert_eq!(exec.match_strategy, MatchStrategy::FirstInOrder);
        assert!((exec.proximity_threshold_deg - 0.0005).abs() < f64::EPSILON);
        assert!(!exec.allow_archived_start);
    }

    #[test]
    fn test_matcher_follows_metric() {
        let mut exec = ExecutionSettings::default();
        assert_eq!(exec.matcher(), KeyPointMatcher::default());

        exec.proximity_metric = ProximityMetric::Haversine;
        assert_eq!(exec.matcher().rule().metric(), ProximityMetric::Haversine);
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = sample();
        settings.jwt.secret = "short".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut settings = sample();
        settings.execution.proximity_radius_m = 0.0;
        assert!(settings.validate().is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(sample().server_addr(), "127.0.0.1:8082");
        assert_eq!(sample().grpc_addr(), "0.0.0.0:50052");
    }
}
