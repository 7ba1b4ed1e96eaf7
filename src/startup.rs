//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    CatalogService, CatalogServiceImpl, ExecutionService, ExecutionServiceImpl, ReviewService,
    ReviewServiceImpl,
};
use crate::config::Settings;
use crate::domain::services::{PurchaseVerifier, RoleResolver};
use crate::domain::TourRepository;
use crate::infrastructure::cache::{self, CachedRoleResolver, RedisCache};
use crate::infrastructure::database;
use crate::infrastructure::grpc::{self, PurchasesGrpcClient};
use crate::infrastructure::repositories::{PgUserRoleRepository, Repositories};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// External stores probed by the readiness endpoint. Absent when the
/// application runs on in-memory repositories.
#[derive(Clone, Default)]
pub struct Backends {
    pub db: Option<PgPool>,
    pub cache: Option<RedisCache>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub executions: Arc<dyn ExecutionService>,
    pub catalog: Arc<dyn CatalogService>,
    pub reviews: Arc<dyn ReviewService>,
    pub purchases: Arc<dyn PurchaseVerifier>,
    /// Fallback for tokens without a role claim
    pub role_resolver: Option<Arc<dyn RoleResolver>>,
    pub backends: Backends,
}

impl AppState {
    /// Wire the application services over the given repositories.
    pub fn new(
        settings: Settings,
        repos: Repositories,
        purchases: Arc<dyn PurchaseVerifier>,
        role_resolver: Option<Arc<dyn RoleResolver>>,
    ) -> Self {
        let snowflake = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.machine_id,
            settings.snowflake.node_id,
        ));

        let executions = Arc::new(ExecutionServiceImpl::new(
            &repos,
            purchases.clone(),
            snowflake.clone(),
            &settings.execution,
        ));
        let catalog = Arc::new(CatalogServiceImpl::new(&repos, snowflake.clone()));
        let reviews = Arc::new(ReviewServiceImpl::new(&repos, snowflake));

        Self {
            settings: Arc::new(settings),
            executions,
            catalog,
            reviews,
            purchases,
            role_resolver,
            backends: Backends::default(),
        }
    }

    pub fn with_backends(mut self, backends: Backends) -> Self {
        self.backends = backends;
        self
    }
}

/// Full router with middleware applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(axum::middleware::from_fn(logging::track_metrics))
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance: the HTTP API plus the tours gRPC server
pub struct Application {
    listener: TcpListener,
    router: Router,
    grpc_addr: SocketAddr,
    tours: Arc<dyn TourRepository>,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        // Create database pool
        let db = database::create_pool(&settings.database)
            .await
            .context("failed to connect to the tours database")?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Database migrations applied");

        // Create Redis cache
        let redis = cache::create_redis_cache(&settings.redis)
            .await
            .context("failed to connect to Redis")?;

        let role_resolver: Option<Arc<dyn RoleResolver>> = match &settings.stakeholders {
            Some(stakeholders) => {
                let pool = database::create_stakeholders_pool(stakeholders)
                    .await
                    .context("failed to connect to the stakeholders database")?;
                let lookup: Arc<dyn RoleResolver> = Arc::new(PgUserRoleRepository::new(pool));
                Some(Arc::new(CachedRoleResolver::new(
                    lookup,
                    redis.clone(),
                    settings.access.role_cache_ttl_secs,
                )))
            }
            None => {
                tracing::info!("No stakeholders database configured; roles come from tokens only");
                None
            }
        };

        // Channel is dialed on first use
        let purchases: Arc<dyn PurchaseVerifier> =
            Arc::new(PurchasesGrpcClient::new(&settings.purchases));

        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .context("invalid server address")?;
        let grpc_addr: SocketAddr = settings
            .grpc_addr()
            .parse()
            .context("invalid gRPC server address")?;

        let repos = Repositories::postgres(db.clone());
        let tours = repos.tours.clone();

        let state = AppState::new(
            settings,
            repos,
            purchases,
            role_resolver,
        )
        .with_backends(Backends {
            db: Some(db),
            cache: Some(redis),
        });

        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self {
            listener,
            router,
            grpc_addr,
            tours,
        })
    }

    /// Run both servers until a shutdown signal, or until either fails
    pub async fn run_until_stopped(self) -> Result<()> {
        let Self {
            listener,
            router,
            grpc_addr,
            tours,
        } = self;

        let http = async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("HTTP server failed")
        };
        let rpc = async move {
            grpc::serve_tours(grpc_addr, tours, shutdown_signal())
                .await
                .context("tours gRPC server failed")
        };

        tokio::try_join!(http, rpc)?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
