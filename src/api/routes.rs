//! HTTP API route definitions.

use std::net::SocketAddr;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{
    create, delete, get_one, health, list, not_found, render_metrics, update, ApiOptions,
    AppState,
};
use super::middleware::{permissive_cors, track_latency};
use crate::config::Config;
use crate::model::{HealthRecord, ResourceKind, User};
use crate::store::{Resource, Store};
use crate::utils::shutdown_signal;

/// Path prefix for every resource route.
pub const API_PREFIX: &str = "/api/v1";

/// Create the API router for one resource.
pub fn create_router<R: Resource>(state: AppState<R>) -> Router {
    let collection = format!("/{}", R::COLLECTION);
    let item = format!("/{}/:id", R::COLLECTION);

    let api: Router<AppState<R>> = Router::new()
        .route("/health", get(health::<R>))
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(
            &item,
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        );

    let cors = state.options.cors;

    let router = Router::new()
        .nest(API_PREFIX, api)
        .route("/metrics", get(render_metrics::<R>))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(track_latency))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(middleware::from_fn(permissive_cors))
    } else {
        router
    }
}

/// Build the router for the resource selected in `config`.
pub fn build_app(config: &Config, metrics: Option<PrometheusHandle>) -> Router {
    match config.resource {
        ResourceKind::Records => create_router(app_state::<HealthRecord>(config, metrics)),
        ResourceKind::Users => create_router(app_state::<User>(config, metrics)),
    }
}

/// Bind `addr` and serve `router` until a shutdown signal arrives.
pub async fn serve(router: Router, addr: SocketAddr) -> crate::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn app_state<R: Resource>(config: &Config, metrics: Option<PrometheusHandle>) -> AppState<R> {
    let store = if config.seed {
        Store::seeded()
    } else {
        Store::new()
    };

    let state = AppState::new(store, ApiOptions::from_config(config));
    match metrics {
        Some(handle) => state.with_metrics(handle),
        None => state,
    }
}
