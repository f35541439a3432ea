// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Crux-Tracker: indoor-climbing training session tracking
//!
//! This crate provides the data-access and statistics core behind the
//! training app: route catalog access grouped by wall panel, training
//! session recording, and the dashboard aggregation engine.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use auth::AuthProvider;
use config::Config;
use db::DocumentStore;
use services::{
    DashboardService, ProfileRepository, RouteRepository, SessionRepository, TrainingService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub routes: Arc<RouteRepository>,
    pub sessions: Arc<SessionRepository>,
    pub profiles: ProfileRepository,
    pub dashboard: DashboardService,
    pub training: TrainingService,
}

impl AppState {
    /// Wire repositories and services over one store and auth provider.
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let routes = Arc::new(RouteRepository::new(store.clone()));
        let sessions = Arc::new(SessionRepository::new(store.clone(), auth.clone()));
        let profiles = ProfileRepository::new(store);
        let dashboard = DashboardService::new(routes.clone(), sessions.clone());
        let training = TrainingService::new(sessions.clone(), auth);

        Self {
            config,
            routes,
            sessions,
            profiles,
            dashboard,
            training,
        }
    }
}
