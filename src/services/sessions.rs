// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training-session repository.
//!
//! Sessions are scoped to their owner at `trainingSessions/{userId}` and
//! are created exactly once at end-of-training. Reads degrade to empty
//! collections on backend failure; writes report failure to the caller.

use crate::auth::AuthProvider;
use crate::db::{paths, DocumentStore};
use crate::error::{AppError, Result};
use crate::models::{ClimbingRoute, TrainingSession};
use crate::services::routes::decode_route;
use std::collections::HashMap;
use std::sync::Arc;

/// Repository for training sessions, scoped per user.
pub struct SessionRepository {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Persist a session. Creates under a store-generated key when
    /// `session.id` is empty, otherwise replaces the existing record.
    ///
    /// Returns the session's document key. Fails with an authorization
    /// error when no user is signed in or the session belongs to another
    /// user.
    pub async fn save(&self, session: &TrainingSession) -> Result<String> {
        let user_id = self.require_user(&session.user_id)?;

        let doc = serde_json::to_value(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Session encode failed: {}", e)))?;

        let session_id = if session.id.is_empty() {
            self.store
                .post(&paths::sessions_for_user(&user_id), &doc)
                .await?
        } else {
            self.store
                .put(&paths::session(&user_id, &session.id), &doc)
                .await?;
            session.id.clone()
        };

        tracing::info!(
            user_id = %user_id,
            session_id = %session_id,
            panel_type = %session.panel_type,
            duration_secs = session.duration_secs,
            "Training session saved"
        );
        Ok(session_id)
    }

    /// Delete one session.
    pub async fn delete(&self, user_id: &str, session_id: &str) -> Result<()> {
        let user_id = self.require_user(user_id)?;
        self.store
            .delete(&paths::session(&user_id, session_id))
            .await?;
        tracing::info!(user_id = %user_id, session_id, "Training session deleted");
        Ok(())
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// All sessions for a user, in store order. Ordering for display is
    /// the caller's concern.
    pub async fn get_all(&self, user_id: &str) -> Result<Vec<TrainingSession>> {
        let entries = match self.store.get_all(&paths::sessions_for_user(user_id)).await {
            Ok(entries) => entries,
            Err(e) if e.is_degradable() => {
                tracing::warn!(user_id, error = %e, "Session listing failed, returning empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(entries
            .into_iter()
            .filter_map(|(key, value)| decode_session(&key, value))
            .collect())
    }

    /// One session, or `None` when absent.
    pub async fn get_one(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<TrainingSession>> {
        let doc = match self.store.get(&paths::session(user_id, session_id)).await {
            Ok(doc) => doc,
            Err(e) if e.is_degradable() => {
                tracing::warn!(user_id, session_id, error = %e, "Session fetch failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(doc.and_then(|value| decode_session(session_id, value)))
    }

    /// Routes for a panel as shown on the recording screen.
    ///
    /// The backend path is already scoped by panel, but records are
    /// double-filtered on `panelType` so a stray document can never leak
    /// into another panel's session. Sorted ascending by difficulty.
    pub async fn get_routes_by_panel(&self, panel_type: &str) -> Result<Vec<ClimbingRoute>> {
        let entries = match self.store.get_all(&paths::routes_for_panel(panel_type)).await {
            Ok(entries) => entries,
            Err(e) if e.is_degradable() => {
                tracing::warn!(panel_type, error = %e, "Panel route listing failed");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut routes: Vec<ClimbingRoute> = entries
            .into_iter()
            .filter_map(|(key, value)| decode_route(&key, value))
            .filter(|route| route.panel_type == panel_type)
            .collect();
        routes.sort_by_key(|r| r.difficulty);
        Ok(routes)
    }

    /// Cumulative attempts per route across all of the user's sessions on
    /// one panel, summed regardless of the completed flag.
    ///
    /// Seeds the attempt counters shown before a new session starts.
    pub async fn get_previous_attempts(
        &self,
        panel_type: &str,
        user_id: &str,
    ) -> Result<HashMap<String, u32>> {
        let sessions = self.get_all(user_id).await?;

        let mut attempts: HashMap<String, u32> = HashMap::new();
        for session in sessions.iter().filter(|s| s.panel_type == panel_type) {
            for entry in &session.completed_routes {
                *attempts.entry(entry.route_id.clone()).or_insert(0) += entry.attempts;
            }
        }
        Ok(attempts)
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Resolve the acting user, rejecting unsigned or mismatched access.
    fn require_user(&self, requested: &str) -> Result<String> {
        if requested.is_empty() {
            return Err(AppError::Unauthorized);
        }
        match self.auth.current_user_id() {
            Some(uid) if uid == requested => Ok(uid),
            Some(_) | None => Err(AppError::Unauthorized),
        }
    }
}

/// Decode one stored session, stamping the document key as its id.
fn decode_session(key: &str, value: serde_json::Value) -> Option<TrainingSession> {
    match serde_json::from_value::<TrainingSession>(value) {
        Ok(mut session) => {
            session.id = key.to_string();
            Some(session)
        }
        Err(e) => {
            tracing::warn!(session_id = key, error = %e, "Skipping malformed session document");
            None
        }
    }
}
