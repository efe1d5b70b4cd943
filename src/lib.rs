//! # Formgate - Dynamic Form Schema Server
//!
//! Formgate serves dynamic form schemas: typed field declarations (input
//! kinds, validation rules, option data sources, dependency conditions)
//! that a form renderer turns into UI, plus the option-lookup endpoints
//! those fields need at runtime.
//!
//! ## Features
//!
//! - **Typed contract**: `FormSchema`/`Argument`/`ValidationRule`/`DataSource`
//!   with camelCase serde, interchangeable with the TypeScript-side types
//! - **Structural invariants**: required payloads (remote URLs, patterns)
//!   are enum variant fields, so ill-shaped documents fail to parse
//! - **Catalog validation**: duplicate names and dangling field references
//!   are rejected at load time, all errors reported together
//! - **Option lookups**: static sources served inline, callback sources
//!   dispatched to registered providers
//! - **Live reload**: schema files are re-read on change
//! - **Health & metrics**: Kubernetes-style probes, Prometheus exposition
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formgate::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Loads formgate.toml and config/forms/*
//!     let settings = Settings::new()?;
//!     println!("{} form schema(s)", settings.forms.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::options::CallbackRegistry;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `settings` - Shared settings, reloaded in place by the config watcher
/// * `callbacks` - Providers for fields with `callback` data sources
/// * `metrics` - Metrics collector backing the `/metrics` endpoint
pub fn create_app(
    settings: Arc<RwLock<config::Settings>>,
    callbacks: Arc<CallbackRegistry>,
    metrics: Arc<MetricsCollector>,
) -> Router {
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let metrics_handler = Arc::new(MetricsHandler::new(metrics.clone()));

    let public_router = Router::new()
        .route(
            "/health",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.health().await }
                }
            }),
        )
        .route(
            "/health/ready",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.ready().await }
                }
            }),
        )
        .route(
            "/health/live",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.live().await }
                }
            }),
        )
        .route(
            "/metrics",
            get({
                let handler = metrics_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.metrics().await }
                }
            }),
        );

    let api_state = ApiState {
        settings,
        callbacks,
        metrics,
    };

    let api_router = Router::new()
        .route("/forms", get(api_handler::list_forms))
        .route("/forms/:activity", get(api_handler::get_form))
        .route(
            "/forms/:activity/fields/:field/options",
            get(api_handler::get_field_options),
        )
        .with_state(api_state);

    let router = public_router.nest("/api", api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
