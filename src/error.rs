// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

/// Application error type shared across repositories and services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Sign-in required")]
    Unauthorized,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Route {route_id} has no record under panel {panel_type}")]
    DataIntegrity {
        panel_type: String,
        route_id: String,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short human-readable message for the initiating user action.
    ///
    /// Never exposes a raw transport error string; distinguishes only the
    /// three cases the UI can act on.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "No internet connection. Check your network and try again.",
            AppError::Unauthorized => "Please sign in to continue.",
            _ => "A temporary service issue occurred. Please try again shortly.",
        }
    }

    /// Whether a read path should degrade to an empty result instead of
    /// propagating this error.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::NotFound(_) | AppError::DataIntegrity { .. }
        )
    }
}

/// Result type alias for repositories and services
pub type Result<T> = std::result::Result<T, AppError>;
