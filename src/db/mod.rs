//! Database layer (path-addressed document store).

pub mod memory;
pub mod rtdb;

pub use memory::MemoryStore;
pub use rtdb::RtdbStore;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Contract of the remote document store.
///
/// Paths are `/`-separated, rooted at the database root. The backing
/// service is the single source of truth; there is no local persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document at `path`, or `None` if absent.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Fetch all child documents under `path` as `(key, document)` pairs,
    /// ordered by key.
    async fn get_all(&self, path: &str) -> Result<Vec<(String, Value)>>;

    /// Write the document at `path`, replacing any existing one.
    async fn put(&self, path: &str, doc: &Value) -> Result<()>;

    /// Create a child document under `path` with a server-generated key.
    /// Returns the generated key.
    async fn post(&self, path: &str, doc: &Value) -> Result<String>;

    /// Delete the document at `path`.
    async fn delete(&self, path: &str) -> Result<()>;

    /// List the child keys under `path` without fetching documents.
    async fn list_child_keys(&self, path: &str) -> Result<Vec<String>>;
}

/// Store path layout.
///
/// The layout is shared with the mobile clients and must stay stable:
/// `routes/{panelType}/{routeId}`, `trainingSessions/{userId}/{sessionId}`,
/// `users/{userId}/profile`, `gyms/{gymId}`, `userProfiles/{userId}`.
pub mod paths {
    use std::borrow::Cow;

    pub const ROUTES: &str = "routes";
    pub const TRAINING_SESSIONS: &str = "trainingSessions";
    pub const USERS: &str = "users";
    pub const GYMS: &str = "gyms";
    pub const USER_PROFILES: &str = "userProfiles";

    /// Percent-encode a user-supplied path segment.
    fn seg(raw: &str) -> Cow<'_, str> {
        urlencoding::encode(raw)
    }

    pub fn routes_for_panel(panel_type: &str) -> String {
        format!("{}/{}", ROUTES, seg(panel_type))
    }

    pub fn route(panel_type: &str, route_id: &str) -> String {
        format!("{}/{}/{}", ROUTES, seg(panel_type), seg(route_id))
    }

    pub fn sessions_for_user(user_id: &str) -> String {
        format!("{}/{}", TRAINING_SESSIONS, seg(user_id))
    }

    pub fn session(user_id: &str, session_id: &str) -> String {
        format!("{}/{}/{}", TRAINING_SESSIONS, seg(user_id), seg(session_id))
    }

    pub fn user_profile(user_id: &str) -> String {
        format!("{}/{}", USER_PROFILES, seg(user_id))
    }

    /// Legacy profile location, kept for accounts created before the
    /// `userProfiles` collection existed.
    pub fn legacy_user_profile(user_id: &str) -> String {
        format!("{}/{}/profile", USERS, seg(user_id))
    }

    pub fn gym(gym_id: &str) -> String {
        format!("{}/{}", GYMS, seg(gym_id))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_path_layout() {
            assert_eq!(route("Verticale", "r1"), "routes/Verticale/r1");
            assert_eq!(sessions_for_user("u1"), "trainingSessions/u1");
            assert_eq!(session("u1", "s9"), "trainingSessions/u1/s9");
            assert_eq!(user_profile("u1"), "userProfiles/u1");
            assert_eq!(legacy_user_profile("u1"), "users/u1/profile");
            assert_eq!(gym("g1"), "gyms/g1");
        }

        #[test]
        fn test_segments_are_encoded() {
            assert_eq!(
                routes_for_panel("Grande Strapiombo"),
                "routes/Grande%20Strapiombo"
            );
        }
    }
}
