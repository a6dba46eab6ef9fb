//! Library loan server
//!
//! Tracks book stock and loan records and exposes borrow/return over a REST
//! JSON API. Every borrow and return runs as one PostgreSQL transaction that
//! relies on row locks to keep stock non-negative, enforce the per-member
//! loan quota and prevent duplicate active loans.

use std::sync::Arc;

pub mod api;
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
}
