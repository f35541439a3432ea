// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-progress training session recorder.
//!
//! The recorder is a plain synchronous state machine (`Idle → Active →
//! Ended`) driven by a cooperative 1 Hz `tick()`. The async host owns the
//! clock; [`drive_clock`] is the tokio driver the app uses. Persisting the
//! finished session goes through [`TrainingService`].

use crate::auth::AuthProvider;
use crate::error::{AppError, Result};
use crate::models::{ClimbingRoute, CompletedRoute, TrainingSession};
use crate::services::SessionRepository;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorder lifecycle. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Active,
    Ended,
}

/// Per-route state shown on the recording screen.
#[derive(Debug, Clone)]
pub struct RouteAttempt {
    pub route: ClimbingRoute,
    /// Cumulative attempts: seed plus anything done this session
    attempts: u32,
    /// Attempts summed from the user's previous sessions on this panel
    previous_attempts: u32,
    completed: bool,
    selected: bool,
}

impl RouteAttempt {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn previous_attempts(&self) -> u32 {
        self.previous_attempts
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Attempts made in this session only. The manual decrement control
    /// may push the counter below the seed, which counts as zero.
    pub fn session_attempts(&self) -> u32 {
        self.attempts.saturating_sub(self.previous_attempts)
    }
}

/// State machine tracking one in-progress training session.
pub struct TrainingRecorder {
    user_id: String,
    panel_type: String,
    state: RecorderState,
    entries: Vec<RouteAttempt>,
    elapsed_secs: i64,
}

impl TrainingRecorder {
    /// Build a recorder for one panel, seeding attempt counters from the
    /// user's previous sessions.
    pub fn new(
        user_id: String,
        panel_type: String,
        routes: Vec<ClimbingRoute>,
        previous_attempts: &HashMap<String, u32>,
    ) -> Self {
        let entries = routes
            .into_iter()
            .map(|route| {
                let seed = previous_attempts.get(&route.id).copied().unwrap_or(0);
                RouteAttempt {
                    route,
                    attempts: seed,
                    previous_attempts: seed,
                    completed: false,
                    selected: false,
                }
            })
            .collect();

        Self {
            user_id,
            panel_type,
            state: RecorderState::Idle,
            entries,
            elapsed_secs: 0,
        }
    }

    // ─── Observable State ────────────────────────────────────────

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn panel_type(&self) -> &str {
        &self.panel_type
    }

    pub fn entries(&self) -> &[RouteAttempt] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&RouteAttempt> {
        self.entries.iter().find(|e| e.selected)
    }

    pub fn elapsed_secs(&self) -> i64 {
        self.elapsed_secs
    }

    /// Elapsed time as shown on screen ("MM:SS").
    pub fn formatted_elapsed(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }

    // ─── Commands ────────────────────────────────────────────────

    /// Advance the clock by one second. Only counts while active.
    pub fn tick(&mut self) {
        if self.state == RecorderState::Active {
            self.elapsed_secs += 1;
        }
    }

    /// Select a route. The first selection starts the session clock;
    /// selecting another route deselects the previous one.
    pub fn select_route(&mut self, route_id: &str) {
        if self.state == RecorderState::Ended {
            return;
        }
        if !self.entries.iter().any(|e| e.route.id == route_id) {
            tracing::warn!(route_id, "Ignoring selection of unknown route");
            return;
        }

        for entry in &mut self.entries {
            entry.selected = entry.route.id == route_id;
        }

        if self.state == RecorderState::Idle {
            self.state = RecorderState::Active;
            tracing::debug!(panel_type = %self.panel_type, "Training session started");
        }
    }

    /// Toggle a route's completion flag.
    ///
    /// Completing adds one attempt; un-completing takes it back, but never
    /// below the seeded previous-attempts value.
    pub fn toggle_completed(&mut self, route_id: &str) {
        if self.state == RecorderState::Ended {
            return;
        }
        let Some(entry) = self.entries.iter_mut().find(|e| e.route.id == route_id) else {
            return;
        };

        if entry.completed {
            entry.completed = false;
            entry.attempts = entry.attempts.saturating_sub(1).max(entry.previous_attempts);
        } else {
            entry.completed = true;
            entry.attempts += 1;
        }
    }

    /// Manual attempt increment.
    pub fn increment_attempts(&mut self, route_id: &str) {
        if self.state == RecorderState::Ended {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.route.id == route_id) {
            entry.attempts += 1;
        }
    }

    /// Manual attempt decrement, floored at zero. Unlike the completion
    /// toggle this may go below the seeded value.
    pub fn decrement_attempts(&mut self, route_id: &str) {
        if self.state == RecorderState::Ended {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.route.id == route_id) {
            entry.attempts = entry.attempts.saturating_sub(1);
        }
    }

    /// End the session and build the record to persist.
    ///
    /// Returns `None` when nothing was selected (the session is discarded)
    /// or when the recorder already ended; safe to call again from view
    /// teardown after an explicit end.
    pub fn end_training(&mut self) -> Option<TrainingSession> {
        if self.state == RecorderState::Ended {
            return None;
        }
        self.state = RecorderState::Ended;

        let selected = self.entries.iter().find(|e| e.selected)?;

        Some(TrainingSession {
            id: String::new(),
            user_id: self.user_id.clone(),
            panel_type: self.panel_type.clone(),
            timestamp: chrono::Utc::now(),
            duration_secs: self.elapsed_secs,
            completed_routes: vec![CompletedRoute {
                route_id: selected.route.id.clone(),
                completed: selected.completed,
                attempts: selected.session_attempts(),
            }],
        })
    }
}

/// Drive a recorder's clock at 1 Hz until it ends.
///
/// The host shares the recorder behind a mutex with its UI bindings; this
/// task stops on its own once the recorder reaches `Ended`.
pub async fn drive_clock(recorder: Arc<tokio::sync::Mutex<TrainingRecorder>>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick completes immediately; consume it so the clock starts
    // counting one second from now.
    interval.tick().await;

    loop {
        interval.tick().await;
        let mut recorder = recorder.lock().await;
        if recorder.state() == RecorderState::Ended {
            break;
        }
        recorder.tick();
    }
}

// ─────────────────────────────────────────────────────────────────
// TrainingService - recorder setup and end-of-session persistence
// ─────────────────────────────────────────────────────────────────

/// Result of the end-of-session flow.
#[derive(Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    /// No route was selected; nothing was persisted.
    Discarded,
    /// The user declined the save prompt; nothing was persisted.
    Declined,
    /// The session was persisted under the returned key.
    Saved { session_id: String },
}

/// Glue between the recorder and the repositories.
pub struct TrainingService {
    sessions: Arc<SessionRepository>,
    auth: Arc<dyn AuthProvider>,
}

impl TrainingService {
    pub fn new(sessions: Arc<SessionRepository>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { sessions, auth }
    }

    /// Build a recorder for a panel: loads its routes and seeds the
    /// attempt counters from the user's previous sessions.
    pub async fn start(&self, panel_type: &str) -> Result<TrainingRecorder> {
        let user_id = self.auth.current_user_id().ok_or(AppError::Unauthorized)?;

        let routes = self.sessions.get_routes_by_panel(panel_type).await?;
        let previous = self
            .sessions
            .get_previous_attempts(panel_type, &user_id)
            .await?;

        tracing::debug!(
            panel_type,
            route_count = routes.len(),
            seeded_routes = previous.len(),
            "Recorder ready"
        );
        Ok(TrainingRecorder::new(
            user_id,
            panel_type.to_string(),
            routes,
            &previous,
        ))
    }

    /// Run the end-of-session flow. `confirmed` is the user's answer to
    /// the save prompt; it is only consulted when there is something to
    /// save.
    pub async fn finish(
        &self,
        recorder: &mut TrainingRecorder,
        confirmed: bool,
    ) -> Result<FinishOutcome> {
        match recorder.end_training() {
            None => {
                tracing::info!("Training ended with no route selected, session discarded");
                Ok(FinishOutcome::Discarded)
            }
            Some(_) if !confirmed => {
                tracing::info!("Training save declined");
                Ok(FinishOutcome::Declined)
            }
            Some(session) => {
                let session_id = self.sessions.save(&session).await?;
                Ok(FinishOutcome::Saved { session_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_route(id: &str, difficulty: u8) -> ClimbingRoute {
        ClimbingRoute {
            id: id.to_string(),
            name: format!("Route {}", id),
            color: "Verde".to_string(),
            color_hex: None,
            difficulty,
            panel_type: "Verticale".to_string(),
            created_date: Utc::now(),
            is_active: true,
        }
    }

    fn make_recorder(previous: &[(&str, u32)]) -> TrainingRecorder {
        let seeds: HashMap<String, u32> = previous
            .iter()
            .map(|(id, n)| (id.to_string(), *n))
            .collect();
        TrainingRecorder::new(
            "u1".to_string(),
            "Verticale".to_string(),
            vec![make_route("r1", 3), make_route("r2", 5)],
            &seeds,
        )
    }

    fn entry<'a>(recorder: &'a TrainingRecorder, id: &str) -> &'a RouteAttempt {
        recorder
            .entries()
            .iter()
            .find(|e| e.route.id == id)
            .expect("route entry")
    }

    #[test]
    fn test_first_selection_starts_session() {
        let mut recorder = make_recorder(&[]);
        assert_eq!(recorder.state(), RecorderState::Idle);

        recorder.tick();
        assert_eq!(recorder.elapsed_secs(), 0); // Idle: clock not running

        recorder.select_route("r1");
        assert_eq!(recorder.state(), RecorderState::Active);

        recorder.tick();
        recorder.tick();
        assert_eq!(recorder.elapsed_secs(), 2);
        assert_eq!(recorder.formatted_elapsed(), "00:02");
    }

    #[test]
    fn test_single_select_invariant() {
        let mut recorder = make_recorder(&[]);
        recorder.select_route("r1");
        recorder.select_route("r2");

        let selected: Vec<&str> = recorder
            .entries()
            .iter()
            .filter(|e| e.is_selected())
            .map(|e| e.route.id.as_str())
            .collect();
        assert_eq!(selected, vec!["r2"]);
    }

    #[test]
    fn test_unknown_route_selection_ignored() {
        let mut recorder = make_recorder(&[]);
        recorder.select_route("ghost");
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(recorder.selected().is_none());
    }

    #[test]
    fn test_toggle_adjusts_attempts() {
        let mut recorder = make_recorder(&[("r1", 3)]);
        recorder.select_route("r1");

        recorder.toggle_completed("r1");
        assert!(entry(&recorder, "r1").is_completed());
        assert_eq!(entry(&recorder, "r1").attempts(), 4);

        recorder.toggle_completed("r1");
        assert!(!entry(&recorder, "r1").is_completed());
        assert_eq!(entry(&recorder, "r1").attempts(), 3);
    }

    #[test]
    fn test_toggle_decrement_floors_at_seed() {
        let mut recorder = make_recorder(&[("r1", 3)]);
        recorder.select_route("r1");

        // Manual decrement below the seed, then un-complete: the toggle
        // floor protects the seed, not the manual control.
        recorder.toggle_completed("r1"); // attempts 4
        recorder.decrement_attempts("r1"); // attempts 3
        recorder.decrement_attempts("r1"); // attempts 2, below seed
        recorder.toggle_completed("r1"); // un-complete: floors back at 3
        assert_eq!(entry(&recorder, "r1").attempts(), 3);
    }

    #[test]
    fn test_manual_decrement_floors_at_zero() {
        let mut recorder = make_recorder(&[("r1", 1)]);
        recorder.select_route("r1");

        recorder.decrement_attempts("r1");
        recorder.decrement_attempts("r1");
        assert_eq!(entry(&recorder, "r1").attempts(), 0);
        assert_eq!(entry(&recorder, "r1").session_attempts(), 0);
    }

    #[test]
    fn test_end_without_selection_discards() {
        let mut recorder = make_recorder(&[]);
        recorder.increment_attempts("r1");
        assert!(recorder.end_training().is_none());
        assert_eq!(recorder.state(), RecorderState::Ended);
    }

    #[test]
    fn test_end_builds_delta_record_for_selected_route_only() {
        let mut recorder = make_recorder(&[("r1", 3)]);
        recorder.select_route("r1");
        recorder.toggle_completed("r1"); // 4
        recorder.increment_attempts("r1"); // 5
        recorder.increment_attempts("r2"); // not selected, must not appear
        recorder.tick();
        recorder.tick();

        let session = recorder.end_training().expect("session draft");
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.panel_type, "Verticale");
        assert_eq!(session.duration_secs, 2);
        assert_eq!(session.completed_routes.len(), 1);

        let record = &session.completed_routes[0];
        assert_eq!(record.route_id, "r1");
        assert!(record.completed);
        assert_eq!(record.attempts, 2); // 5 - 3, this session only
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut recorder = make_recorder(&[]);
        recorder.select_route("r1");
        assert!(recorder.end_training().is_some());
        // Teardown racing an explicit end must be a no-op.
        assert!(recorder.end_training().is_none());

        recorder.tick();
        assert_eq!(recorder.elapsed_secs(), 0);
        recorder.toggle_completed("r1");
        assert!(!entry(&recorder, "r1").is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_clock_ticks_at_one_hz() {
        let mut recorder = make_recorder(&[]);
        recorder.select_route("r1");
        let recorder = Arc::new(tokio::sync::Mutex::new(recorder));

        let clock = tokio::spawn(drive_clock(recorder.clone()));
        tokio::time::sleep(std::time::Duration::from_millis(3500)).await;

        assert_eq!(recorder.lock().await.elapsed_secs(), 3);

        recorder.lock().await.end_training();
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        assert!(clock.is_finished());
        assert_eq!(recorder.lock().await.elapsed_secs(), 3);
    }
}
