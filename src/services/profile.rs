//! User profile and gym lookups.

use crate::db::{paths, DocumentStore};
use crate::error::{AppError, Result};
use crate::models::{Gym, UserProfile};
use std::sync::Arc;

/// Pass-through repository for profile and gym documents.
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch a user's profile, falling back to the legacy
    /// `users/{userId}/profile` location for old accounts.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let primary = self.fetch_profile(&paths::user_profile(user_id)).await?;
        if primary.is_some() {
            return Ok(primary);
        }
        self.fetch_profile(&paths::legacy_user_profile(user_id)).await
    }

    pub async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let doc = serde_json::to_value(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Profile encode failed: {}", e)))?;
        self.store.put(&paths::user_profile(user_id), &doc).await
    }

    pub async fn get_gym(&self, gym_id: &str) -> Result<Option<Gym>> {
        let doc = match self.store.get(&paths::gym(gym_id)).await {
            Ok(doc) => doc,
            Err(e) if e.is_degradable() => {
                tracing::warn!(gym_id, error = %e, "Gym fetch failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(doc.and_then(|value| match serde_json::from_value::<Gym>(value) {
            Ok(mut gym) => {
                gym.id = gym_id.to_string();
                Some(gym)
            }
            Err(e) => {
                tracing::warn!(gym_id, error = %e, "Skipping malformed gym document");
                None
            }
        }))
    }

    async fn fetch_profile(&self, path: &str) -> Result<Option<UserProfile>> {
        let doc = match self.store.get(path).await {
            Ok(doc) => doc,
            Err(e) if e.is_degradable() => {
                tracing::warn!(path, error = %e, "Profile fetch failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(doc.and_then(|value| serde_json::from_value(value).ok()))
    }
}
