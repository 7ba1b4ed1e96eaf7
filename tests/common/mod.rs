//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use tour_service::config::{
    AccessSettings, CorsSettings, DatabaseSettings, ExecutionSettings, GrpcServerSettings,
    JwtSettings, PurchasesSettings, RedisSettings, ServerSettings, Settings, SnowflakeSettings,
};
use tour_service::domain::services::{Entitlement, EntitlementError, PurchaseVerifier};
use tour_service::domain::UserId;
use tour_service::infrastructure::repositories::Repositories;
use tour_service::startup::{build_router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub const GUIDE_ID: i64 = 100;
pub const TOURIST_ID: i64 = 200;

/// What the fake purchases service answers
#[derive(Debug, Clone, Copy)]
pub enum Purchases {
    Purchased,
    NotPurchased,
    Down,
}

#[async_trait]
impl PurchaseVerifier for Purchases {
    async fn verify_purchase(
        &self,
        user_id: UserId,
        tour_id: i64,
    ) -> Result<Entitlement, EntitlementError> {
        // Suspend like a network call so concurrent requests interleave.
        tokio::task::yield_now().await;
        match self {
            Purchases::Purchased => Ok(Entitlement::purchased(format!(
                "token-{}-{}",
                user_id, tour_id
            ))),
            Purchases::NotPurchased => Ok(Entitlement::not_purchased()),
            Purchases::Down => Err(EntitlementError::Unreachable("connection refused".into())),
        }
    }

    async fn is_reachable(&self) -> bool {
        !matches!(self, Purchases::Down)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
        },
        stakeholders: None,
        redis: RedisSettings {
            url: "redis://unused".into(),
        },
        jwt: JwtSettings {
            secret: JWT_SECRET.into(),
        },
        purchases: PurchasesSettings {
            addr: "http://unused:50051".into(),
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
        },
        grpc: GrpcServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        execution: ExecutionSettings::default(),
        access: AccessSettings {
            role_cache_ttl_secs: 60,
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

/// Sign a token the way the identity service does.
pub fn token(claims: Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn guide_token() -> String {
    token(json!({ "sub": GUIDE_ID.to_string(), "role": "vodic", "username": "guide" }))
}

pub fn tourist_token() -> String {
    tourist_token_for(TOURIST_ID)
}

/// Numeric `sub`, as some issuers send it.
pub fn tourist_token_for(user_id: i64) -> String {
    token(json!({ "sub": user_id, "role": "turista" }))
}

/// Test application over in-memory repositories
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(Purchases::Purchased, test_settings())
    }

    pub fn with_purchases(purchases: Purchases) -> Self {
        Self::with(purchases, test_settings())
    }

    pub fn with(purchases: Purchases, settings: Settings) -> Self {
        let state = AppState::new(
            settings,
            Repositories::in_memory(),
            Arc::new(purchases),
            None,
        );
        Self {
            router: build_router(state),
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post_auth(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn put_auth(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, Some(token)).await
    }

    /// Create a draft tour as the guide and return its id.
    pub async fn create_tour(&self, name: &str) -> i64 {
        let (status, body) = self
            .post_auth(
                "/api/tours",
                json!({
                    "name": name,
                    "description": "Old town walk",
                    "difficulty": 1,
                    "tags": ["history"],
                }),
                &guide_token(),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create tour: {body}");
        id_of(&body)
    }

    pub async fn add_key_point(&self, tour_id: i64, order: i32, latitude: f64, longitude: f64) -> i64 {
        let (status, body) = self
            .post_auth(
                &format!("/api/tours/{}/keypoints", tour_id),
                json!({
                    "name": format!("Stop {}", order),
                    "latitude": latitude,
                    "longitude": longitude,
                    "order": order,
                }),
                &guide_token(),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add key point: {body}");
        id_of(&body)
    }

    /// A published tour whose key points 2 and 3 overlap around (45.0012, 19.0).
    pub async fn published_tour(&self) -> PublishedTour {
        let tour_id = self.create_tour("Petrovaradin").await;
        let key_points = [
            self.add_key_point(tour_id, 1, 45.0, 19.0).await,
            self.add_key_point(tour_id, 2, 45.0010, 19.0).await,
            self.add_key_point(tour_id, 3, 45.0013, 19.0).await,
        ];

        let (status, body) = self
            .post_auth(
                &format!("/api/tours/{}/travel-times", tour_id),
                json!({ "transport_type": "walking", "duration_min": 45 }),
                &guide_token(),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "travel time: {body}");

        let (status, body) = self
            .post_auth(
                &format!("/api/tours/{}/publish", tour_id),
                json!({}),
                &guide_token(),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "publish: {body}");

        PublishedTour {
            id: tour_id,
            key_points,
        }
    }

    /// Start the tour as `token` at (45.0, 19.0); returns the raw response.
    pub async fn start(&self, tour_id: i64, token: &str) -> (StatusCode, Value) {
        self.post_auth(
            &format!("/api/tours/{}/start", tour_id),
            json!({ "latitude": 45.0, "longitude": 19.0 }),
            token,
        )
        .await
    }
}

pub struct PublishedTour {
    pub id: i64,
    pub key_points: [i64; 3],
}

pub fn id_of(body: &Value) -> i64 {
    body["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("no id in {body}"))
}
