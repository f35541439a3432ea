// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training session model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One attempted route within one training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRoute {
    /// Route document key under the session's panel
    pub route_id: String,
    /// Whether the route was topped
    pub completed: bool,
    /// Attempts made during this session
    pub attempts: u32,
}

/// A recorded training session.
///
/// Stored at `trainingSessions/{userId}/{sessionId}`. Created exactly once
/// at end-of-training and immutable afterward (delete-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    /// Document key (set from the store path on reads)
    #[serde(default)]
    pub id: String,
    /// Owner (partition key)
    pub user_id: String,
    /// Wall panel the session was climbed on
    pub panel_type: String,
    /// When the session ended
    pub timestamp: DateTime<Utc>,
    /// Elapsed training time in seconds
    #[serde(rename = "duration")]
    pub duration_secs: i64,
    /// Routes attempted during the session
    #[serde(default)]
    pub completed_routes: Vec<CompletedRoute>,
}

impl TrainingSession {
    /// Number of routes attempted in this session.
    pub fn total_routes(&self) -> u32 {
        self.completed_routes.len() as u32
    }

    /// Number of routes topped in this session.
    pub fn completed_count(&self) -> u32 {
        self.completed_routes
            .iter()
            .filter(|r| r.completed)
            .count() as u32
    }

    /// Calendar date of the session in the device's timezone, for daily
    /// frequency bucketing.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp
            .with_timezone(&chrono::Local)
            .date_naive()
    }

    /// Elapsed time in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration_secs / 60
    }
}
