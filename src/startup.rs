use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings},
    migrations::{run_migrations, MigrationError},
    routes::{health_check, subscriptions, ErrorBody},
    telemetry::{record_response, request_span, RequestUuid},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{any::Any, net::SocketAddr, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to the database")]
    Database(#[source] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("Failed to bind `{address}`")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct Application {
    listener: TcpListener,
    router: Router,
    db_pool: PgPool,
}

impl Application {
    /// Connects the pool, brings the schema up to date and binds the
    /// listener. Any failure here is fatal to the process.
    pub async fn build(settings: Settings) -> Result<Self, StartupError> {
        let db_pool = get_connection_pool(&settings.database)
            .await
            .map_err(StartupError::Database)?;

        let applied = run_migrations(&db_pool, &settings.migrations.directory).await?;
        tracing::info!(applied = applied.len(), "Database schema is up to date");

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;

        let router = router(
            AppState::new(db_pool.clone()),
            settings.application.request_timeout(),
        );

        Ok(Self {
            listener,
            router,
            db_pool,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serves until Ctrl+C or SIGTERM, then drains in-flight requests and
    /// closes the connection pool.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.listener.local_addr()?);

        let served = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        self.db_pool.close().await;
        tracing::info!("Server stopped");
        served
    }
}

pub async fn get_connection_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .idle_timeout(settings.idle_timeout())
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(settings.with_db())
        .await
}

pub fn router(app_state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .merge(health_check::router())
        .merge(subscriptions::router())
        .with_state(app_state);

    with_middleware(routes, request_timeout)
}

/// Layers run outermost first. The request id wraps everything, so timeouts
/// and recovered panics carry `x-request-id` too.
fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(record_response),
            )
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic.message = message, "Request handler panicked");

    let body = ErrorBody {
        error: "Internal error".into(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error.cause_chain = ?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
