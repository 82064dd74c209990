//! Products API Library
//!
//! CRUD HTTP service for a product catalogue with soft deletes.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod telemetry;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// State backed by the SeaORM repositories on `db`
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Full HTTP surface: products, health, OpenAPI docs, access logging and request ids
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/products", handlers::products::products_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(telemetry::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

pub mod prelude {
    pub use crate::config::{AppConfig, AppConfigError};
    pub use crate::dto::{FieldErrors, ProductRequest, ProductResponse};
    pub use crate::entities::{Product, ProductModel};
    pub use crate::errors::{ApiError, DetailResponse, ServiceError};
    pub use crate::repositories::{ProductRepository, RepositoryError, SeaOrmProductRepository};
    pub use crate::services::ProductService;
    pub use crate::{app_router, AppState};
}
