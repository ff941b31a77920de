//! Stockroom API Library
//!
//! Inventory management backend: product catalog, categories, an append-only
//! stock transaction ledger, key/value settings, and dashboard aggregates.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// All `/api/v1` resource routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::router())
        .nest("/categories", handlers::categories::router())
        .nest("/transactions", handlers::transactions::router())
        .nest("/settings", handlers::settings::router())
        .nest("/dashboard", handlers::dashboard::router())
}

/// Full application router: banner, health check, versioned API, Swagger UI.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "stockroom-api up" }))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
