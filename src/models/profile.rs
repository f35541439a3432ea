//! User profile and gym models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile stored at `userProfiles/{userId}`.
///
/// Older accounts may still live at the legacy `users/{userId}/profile`
/// location; the profile repository handles the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name shown in the app
    pub display_name: String,
    /// Email address (may be absent)
    #[serde(default)]
    pub email: Option<String>,
    /// Home gym document key
    #[serde(default)]
    pub home_gym_id: Option<String>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

/// Gym record stored at `gyms/{gymId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    /// Document key (set from the store path on reads)
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}
