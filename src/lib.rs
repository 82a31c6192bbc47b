// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Watch-Activity: per-user activity log for watched items
//!
//! This crate records events such as ratings, status changes and imports
//! against items on a user's watched list, and lists them back to their
//! owner.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::ActivityService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub activity_service: ActivityService,
}
