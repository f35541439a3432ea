//! Dashboard aggregation outputs.
//!
//! These are computed from training sessions and route metadata on every
//! dashboard load; nothing here is persisted.

use crate::models::TrainingSession;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline counters shown at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Number of recorded sessions
    pub total_sessions: u32,
    /// Sum of routes attempted across sessions
    pub total_routes_attempted: u32,
    /// Sum of routes topped across sessions
    pub total_routes_completed: u32,
    /// Completed / attempted, as a percentage (0 when nothing attempted)
    pub completion_rate: f64,
    /// Total training time in minutes
    pub total_training_minutes: i64,
    /// Average session length in minutes (0 when no sessions)
    pub average_session_minutes: f64,
}

/// One day of the session-frequency series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub sessions: u32,
}

/// Training minutes for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayMinutes {
    /// Three-letter weekday label, Mon..Sun
    pub weekday: &'static str,
    pub minutes: i64,
}

/// Everything one dashboard load produces.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    /// Dense daily series over the trailing window (oldest first)
    pub frequency: Vec<DailyCount>,
    /// Topped-route count per difficulty grade
    pub difficulty_distribution: BTreeMap<u8, u32>,
    /// Floor percentage of tops per attempted grade
    pub completion_rate_by_difficulty: BTreeMap<u8, u32>,
    /// Mean attempts per topped grade
    pub average_attempts_by_difficulty: BTreeMap<u8, f64>,
    /// Fixed 7-bucket training time split, Mon..Sun
    pub weekday_minutes: Vec<WeekdayMinutes>,
    /// Most recent sessions, newest first
    pub recent_sessions: Vec<TrainingSession>,
}
