#![allow(clippy::must_use_candidate)]

mod extract;
pub mod fault;
mod health;
mod registry;
pub mod request_log;
mod settings;
mod simulations;
mod state;
pub mod translator;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use http::{StatusCode, Uri};
use stress_config::Config;
use stress_core::{AppError, Details};

pub use extract::{JsonBody, QueryObject};
pub use fault::{Fault, FaultReport, Unexpected};
pub use registry::{Event, EventKind, Simulation, SimulationKind, SimulationRegistry, SimulationStatus};
pub use settings::{PublicLimits, PublicSettings};
pub use state::AppState;
pub use translator::ErrorPolicy;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let state = AppState::from_config(config);

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        let api = Router::new()
            .route("/api/config", get(settings::settings_handler))
            .route("/api/simulations", get(simulations::list_simulations))
            .route("/api/simulations/cpu", post(simulations::start_cpu_stress))
            .route("/api/simulations/memory", post(simulations::start_memory_pressure))
            .route("/api/simulations/blocking", post(simulations::start_blocking))
            .route("/api/simulations/slow", post(simulations::start_slow_request))
            .route(
                "/api/simulations/{id}",
                get(simulations::get_simulation).delete(simulations::stop_simulation),
            )
            .route("/api/events", get(simulations::list_events))
            .with_state(state);

        app = app.merge(api);

        Ok(Self {
            router: apply_boundary(app, config),
            listen_address: config.server.listen_address(),
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener. Serve it
    /// with connect info so probe detection can see the peer address.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("graceful shutdown initiated");
        })
        .await?;

        Ok(())
    }
}

/// Wrap a router in the error boundary
///
/// Adds the JSON fallbacks for unknown routes and methods, the fault
/// translator, and the request log as the outermost layer. Must be the
/// last step of router assembly: routes added afterwards bypass it.
pub fn apply_boundary(router: Router, config: &Config) -> Router {
    fault::install_panic_hook();

    let policy = ErrorPolicy::from_config(config);

    // Applied innermost first
    let mut app = router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum::middleware::from_fn(move |req, next| {
            translator::translate_faults(policy, req, next)
        }));

    if config.log.request_log {
        let probe_path: Arc<str> = Arc::from(config.server.health.path.as_str());
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            request_log::log_requests(Arc::clone(&probe_path), req, next)
        }));
    }

    app
}

async fn route_not_found(uri: Uri) -> Fault {
    let mut details = Details::new();
    details.insert("path".to_owned(), uri.path().into());

    AppError::not_found("Route not found").with_details(details).into()
}

async fn method_not_allowed() -> Fault {
    AppError::custom(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", "Method not allowed for this route").into()
}
