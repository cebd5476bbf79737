//! LendLog - Personal Book Lending Tracker
//!
//! A small REST server for tracking books lent out to friends: who has
//! what, when it is due back, and how much the late-return penalty has
//! accrued. The penalty/status engine in [`penalty`] is pure date
//! arithmetic; everything else is thin CRUD around it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod penalty;
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
