// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard statistics aggregation.
//!
//! Pure functions over a snapshot of training sessions plus a per-panel
//! route-difficulty index. Every function treats empty or unresolvable
//! input as empty output; a dashboard degrades, it never fails. Session
//! entries whose route id no longer resolves are skipped.

use crate::models::{
    DailyCount, DashboardData, DashboardSummary, TrainingSession, WeekdayMinutes,
};
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Trailing window of the session-frequency chart.
pub const FREQUENCY_WINDOW_DAYS: u32 = 30;

/// How many sessions the "recent sessions" list shows.
pub const RECENT_SESSIONS_LIMIT: usize = 5;

/// Weekday labels in chart order.
const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Route difficulty by panel type and route id.
///
/// Built once per aggregation pass; each panel's route list is fetched at
/// most once regardless of how many sessions reference it.
pub type RouteDifficultyIndex = HashMap<String, HashMap<String, u8>>;

/// Look up a session entry's difficulty, `None` when the route record no
/// longer exists under the session's panel.
fn resolve_difficulty(
    index: &RouteDifficultyIndex,
    panel_type: &str,
    route_id: &str,
) -> Option<u8> {
    index.get(panel_type)?.get(route_id).copied()
}

// ─── Summary ─────────────────────────────────────────────────────

/// Headline counters across all sessions.
pub fn summary(sessions: &[TrainingSession]) -> DashboardSummary {
    let total_sessions = sessions.len() as u32;
    let total_routes_attempted: u32 = sessions.iter().map(|s| s.total_routes()).sum();
    let total_routes_completed: u32 = sessions.iter().map(|s| s.completed_count()).sum();
    let total_secs: i64 = sessions.iter().map(|s| s.duration_secs).sum();

    let completion_rate = if total_routes_attempted == 0 {
        0.0
    } else {
        total_routes_completed as f64 * 100.0 / total_routes_attempted as f64
    };
    let average_session_minutes = if total_sessions == 0 {
        0.0
    } else {
        total_secs as f64 / 60.0 / total_sessions as f64
    };

    DashboardSummary {
        total_sessions,
        total_routes_attempted,
        total_routes_completed,
        completion_rate,
        total_training_minutes: total_secs / 60,
        average_session_minutes,
    }
}

// ─── Frequency Series ────────────────────────────────────────────

/// Sessions per calendar day over the trailing `window_days` window.
///
/// The series is dense: exactly `window_days + 1` entries from
/// `today - window_days` through `today` inclusive, zero-filled for days
/// without sessions.
pub fn frequency_series(
    sessions: &[TrainingSession],
    window_days: u32,
    today: NaiveDate,
) -> Vec<DailyCount> {
    let start = today - ChronoDuration::days(window_days as i64);

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for session in sessions {
        let date = session.local_date();
        if date >= start && date <= today {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let mut series = Vec::with_capacity(window_days as usize + 1);
    let mut day = start;
    while day <= today {
        series.push(DailyCount {
            date: day,
            sessions: counts.get(&day).copied().unwrap_or(0),
        });
        day += ChronoDuration::days(1);
    }
    series
}

// ─── Difficulty Charts ───────────────────────────────────────────

/// Count of topped routes per difficulty grade.
pub fn difficulty_distribution(
    sessions: &[TrainingSession],
    index: &RouteDifficultyIndex,
) -> BTreeMap<u8, u32> {
    let mut distribution = BTreeMap::new();
    for session in sessions {
        for entry in session.completed_routes.iter().filter(|e| e.completed) {
            if let Some(difficulty) =
                resolve_difficulty(index, &session.panel_type, &entry.route_id)
            {
                *distribution.entry(difficulty).or_insert(0) += 1;
            }
        }
    }
    distribution
}

/// Floor percentage of tops per attempted difficulty grade.
///
/// Attempts count every session entry regardless of the completed flag;
/// completions count only topped entries.
pub fn completion_rate_by_difficulty(
    sessions: &[TrainingSession],
    index: &RouteDifficultyIndex,
) -> BTreeMap<u8, u32> {
    let mut attempts: BTreeMap<u8, u32> = BTreeMap::new();
    let mut completions: BTreeMap<u8, u32> = BTreeMap::new();

    for session in sessions {
        for entry in &session.completed_routes {
            let Some(difficulty) =
                resolve_difficulty(index, &session.panel_type, &entry.route_id)
            else {
                continue;
            };
            *attempts.entry(difficulty).or_insert(0) += 1;
            if entry.completed {
                *completions.entry(difficulty).or_insert(0) += 1;
            }
        }
    }

    attempts
        .into_iter()
        .map(|(difficulty, attempted)| {
            let completed = completions.get(&difficulty).copied().unwrap_or(0);
            let rate = if attempted == 0 {
                0
            } else {
                completed * 100 / attempted
            };
            (difficulty, rate)
        })
        .collect()
}

/// Arithmetic mean of per-session attempts for topped routes, per grade.
pub fn average_attempts_by_difficulty(
    sessions: &[TrainingSession],
    index: &RouteDifficultyIndex,
) -> BTreeMap<u8, f64> {
    let mut samples: BTreeMap<u8, Vec<u32>> = BTreeMap::new();
    for session in sessions {
        for entry in session.completed_routes.iter().filter(|e| e.completed) {
            if let Some(difficulty) =
                resolve_difficulty(index, &session.panel_type, &entry.route_id)
            {
                samples.entry(difficulty).or_default().push(entry.attempts);
            }
        }
    }

    samples
        .into_iter()
        .map(|(difficulty, values)| {
            let mean = if values.is_empty() {
                0.0
            } else {
                values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
            };
            (difficulty, mean)
        })
        .collect()
}

// ─── Time Charts ─────────────────────────────────────────────────

/// Training minutes per day of week, Mon..Sun, all seven buckets present.
pub fn training_time_by_weekday(sessions: &[TrainingSession]) -> Vec<WeekdayMinutes> {
    let mut minutes = [0i64; 7];
    for session in sessions {
        let weekday = session
            .timestamp
            .with_timezone(&chrono::Local)
            .weekday()
            .num_days_from_monday() as usize;
        minutes[weekday] += session.duration_minutes();
    }

    WEEKDAY_LABELS
        .iter()
        .zip(minutes)
        .map(|(&weekday, minutes)| WeekdayMinutes { weekday, minutes })
        .collect()
}

/// The `limit` most recent sessions, newest first.
pub fn recent_sessions(sessions: &[TrainingSession], limit: usize) -> Vec<TrainingSession> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}

// ─────────────────────────────────────────────────────────────────
// DashboardService - fetching wrapper around the pure functions
// ─────────────────────────────────────────────────────────────────

use crate::error::Result;
use crate::services::{RouteRepository, SessionRepository};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Assembles every dashboard chart from one session snapshot.
pub struct DashboardService {
    routes: Arc<RouteRepository>,
    sessions: Arc<SessionRepository>,
}

impl DashboardService {
    pub fn new(routes: Arc<RouteRepository>, sessions: Arc<SessionRepository>) -> Self {
        Self { routes, sessions }
    }

    /// Load the user's sessions and compute all aggregates in one pass.
    pub async fn load(&self, user_id: &str) -> Result<DashboardData> {
        let sessions = self.sessions.get_all(user_id).await?;
        let index = self.build_difficulty_index(&sessions).await?;
        let today = chrono::Local::now().date_naive();

        report_unresolved_references(&sessions, &index);

        tracing::debug!(
            user_id,
            session_count = sessions.len(),
            panel_count = index.len(),
            "Computing dashboard aggregates"
        );

        Ok(DashboardData {
            summary: summary(&sessions),
            frequency: frequency_series(&sessions, FREQUENCY_WINDOW_DAYS, today),
            difficulty_distribution: difficulty_distribution(&sessions, &index),
            completion_rate_by_difficulty: completion_rate_by_difficulty(&sessions, &index),
            average_attempts_by_difficulty: average_attempts_by_difficulty(&sessions, &index),
            weekday_minutes: training_time_by_weekday(&sessions),
            recent_sessions: recent_sessions(&sessions, RECENT_SESSIONS_LIMIT),
        })
    }

    /// Fetch each referenced panel's route list exactly once and index
    /// difficulties by route id. The index lives for this pass only.
    async fn build_difficulty_index(
        &self,
        sessions: &[TrainingSession],
    ) -> Result<RouteDifficultyIndex> {
        let panels: BTreeSet<&str> = sessions.iter().map(|s| s.panel_type.as_str()).collect();

        let mut index = RouteDifficultyIndex::new();
        for panel_type in panels {
            let routes = self.routes.get_routes(Some(panel_type)).await?;
            index.insert(
                panel_type.to_string(),
                routes
                    .into_iter()
                    .map(|route| (route.id, route.difficulty))
                    .collect(),
            );
        }
        Ok(index)
    }
}

/// Log session entries whose route record no longer exists. The charts
/// skip them; the log is the only trace of the dangling reference.
fn report_unresolved_references(sessions: &[TrainingSession], index: &RouteDifficultyIndex) {
    for session in sessions {
        for entry in &session.completed_routes {
            if resolve_difficulty(index, &session.panel_type, &entry.route_id).is_none() {
                let err = crate::error::AppError::DataIntegrity {
                    panel_type: session.panel_type.clone(),
                    route_id: entry.route_id.clone(),
                };
                tracing::warn!(session_id = %session.id, error = %err, "Chart entry skipped");
            }
        }
    }
}
