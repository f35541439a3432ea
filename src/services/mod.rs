// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - repositories and business logic.

pub mod profile;
pub mod routes;
pub mod sessions;
pub mod stats;
pub mod training;

pub use profile::ProfileRepository;
pub use routes::RouteRepository;
pub use sessions::SessionRepository;
pub use stats::DashboardService;
pub use training::{FinishOutcome, RecorderState, TrainingRecorder, TrainingService};
