// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod dashboard;
pub mod profile;
pub mod route;
pub mod session;

pub use dashboard::{DailyCount, DashboardData, DashboardSummary, WeekdayMinutes};
pub use profile::{Gym, UserProfile};
pub use route::ClimbingRoute;
pub use session::{CompletedRoute, TrainingSession};
