//! Catalog Server
//!
//! A Rust REST API microservice for managing a book catalog, with JWT
//! role-based authorization and optimistic-locking persistence.

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub policy: Arc<auth::AccessPolicy>,
}
