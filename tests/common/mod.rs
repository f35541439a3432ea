// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crux_tracker::auth::StaticAuth;
use crux_tracker::db::{DocumentStore, MemoryStore};
use crux_tracker::error::{AppError, Result};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_USER: &str = "u1";

/// Auth provider matching the seeded test user.
#[allow(dead_code)]
pub fn test_auth() -> Arc<StaticAuth> {
    Arc::new(StaticAuth::new(TEST_USER, "test_token"))
}

/// Route document as the mobile clients write it.
#[allow(dead_code)]
pub fn route_doc(name: &str, difficulty: u8, panel: &str) -> Value {
    json!({
        "name": name,
        "color": "Rosso",
        "difficulty": difficulty,
        "panelType": panel,
        "createdDate": "2026-05-01T09:00:00Z",
        "isActive": true
    })
}

#[allow(dead_code)]
pub async fn seed_route(store: &MemoryStore, panel: &str, id: &str, name: &str, difficulty: u8) {
    store
        .put(
            &format!("routes/{}/{}", panel, id),
            &route_doc(name, difficulty, panel),
        )
        .await
        .expect("seed route");
}

/// Session document as the mobile clients write it.
#[allow(dead_code)]
pub fn session_doc(
    panel: &str,
    timestamp: DateTime<Utc>,
    duration_secs: i64,
    entries: &[(&str, bool, u32)],
) -> Value {
    let completed_routes: Vec<Value> = entries
        .iter()
        .map(|(route_id, completed, attempts)| {
            json!({
                "routeId": route_id,
                "completed": completed,
                "attempts": attempts
            })
        })
        .collect();

    json!({
        "userId": TEST_USER,
        "panelType": panel,
        "timestamp": timestamp.to_rfc3339(),
        "duration": duration_secs,
        "completedRoutes": completed_routes
    })
}

#[allow(dead_code)]
pub async fn seed_session(
    store: &MemoryStore,
    session_id: &str,
    panel: &str,
    timestamp: DateTime<Utc>,
    duration_secs: i64,
    entries: &[(&str, bool, u32)],
) {
    store
        .put(
            &format!("trainingSessions/{}/{}", TEST_USER, session_id),
            &session_doc(panel, timestamp, duration_secs, entries),
        )
        .await
        .expect("seed session");
}

/// Store where every operation fails with a transport error, for the
/// degrade-to-empty read paths.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _path: &str) -> Result<Option<Value>> {
        Err(AppError::Transport("connection refused".to_string()))
    }

    async fn get_all(&self, _path: &str) -> Result<Vec<(String, Value)>> {
        Err(AppError::Transport("connection refused".to_string()))
    }

    async fn put(&self, _path: &str, _doc: &Value) -> Result<()> {
        Err(AppError::Transport("connection refused".to_string()))
    }

    async fn post(&self, _path: &str, _doc: &Value) -> Result<String> {
        Err(AppError::Transport("connection refused".to_string()))
    }

    async fn delete(&self, _path: &str) -> Result<()> {
        Err(AppError::Transport("connection refused".to_string()))
    }

    async fn list_child_keys(&self, _path: &str) -> Result<Vec<String>> {
        Err(AppError::Transport("connection refused".to_string()))
    }
}
