// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route repository with the panel-type catalog cache.
//!
//! Panel types are the top-level grouping keys under `routes/`. The list
//! changes rarely, so it is cached in memory with a fixed TTL instead of
//! being refetched on every navigation.

use crate::db::{paths, DocumentStore};
use crate::error::{AppError, Result};
use crate::models::ClimbingRoute;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use validator::Validate;

/// How long the cached panel-type list stays valid.
const PANEL_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Concurrent per-panel fetches when merging routes across all panels.
const MAX_CONCURRENT_PANEL_FETCHES: usize = 8;

/// Cached panel-type list with its fetch time.
struct CachedPanels {
    names: Vec<String>,
    fetched_at: Instant,
}

/// Repository for climbing routes, partitioned by panel type.
pub struct RouteRepository {
    store: Arc<dyn DocumentStore>,
    panel_cache: RwLock<Option<CachedPanels>>,
    panel_ttl: Duration,
}

impl RouteRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_ttl(store, PANEL_CACHE_TTL)
    }

    /// Override the panel-cache TTL (tests).
    pub fn with_ttl(store: Arc<dyn DocumentStore>, panel_ttl: Duration) -> Self {
        Self {
            store,
            panel_cache: RwLock::new(None),
            panel_ttl,
        }
    }

    // ─── Panel-Type Catalog ──────────────────────────────────────

    /// Get the list of panel types, cached for up to the TTL.
    ///
    /// Concurrent calls during expiry may each refetch; the listing is
    /// idempotent and cheap, so refreshes are deliberately not deduplicated.
    /// On backend failure this returns an empty list so navigation can
    /// degrade instead of crashing.
    pub async fn get_panel_types(&self) -> Result<Vec<String>> {
        {
            let cache = self.panel_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.panel_ttl {
                    return Ok(cached.names.clone());
                }
            }
        }

        let names = match self.store.list_child_keys(paths::ROUTES).await {
            Ok(names) => names,
            Err(e) if e.is_degradable() => {
                tracing::warn!(error = %e, "Panel-type listing failed, returning empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut cache = self.panel_cache.write().await;
        *cache = Some(CachedPanels {
            names: names.clone(),
            fetched_at: Instant::now(),
        });

        tracing::debug!(count = names.len(), "Panel-type cache refreshed");
        Ok(names)
    }

    // ─── Route Reads ─────────────────────────────────────────────

    /// Get routes for one panel, or for every panel when `panel_type` is
    /// `None`, sorted ascending by difficulty (stable, ties keep fetch
    /// order).
    pub async fn get_routes(&self, panel_type: Option<&str>) -> Result<Vec<ClimbingRoute>> {
        let mut routes = match panel_type {
            Some(panel) => self.fetch_panel_routes(panel).await?,
            None => {
                let panels = self.get_panel_types().await?;
                let fetched: Vec<Result<Vec<ClimbingRoute>>> = stream::iter(panels)
                    .map(|panel| async move { self.fetch_panel_routes(&panel).await })
                    .buffered(MAX_CONCURRENT_PANEL_FETCHES)
                    .collect()
                    .await;

                let mut merged = Vec::new();
                for panel_routes in fetched {
                    merged.extend(panel_routes?);
                }
                merged
            }
        };

        routes.sort_by_key(|r| r.difficulty);
        Ok(routes)
    }

    /// Get a single route, or `None` when absent.
    pub async fn get_route(
        &self,
        panel_type: &str,
        route_id: &str,
    ) -> Result<Option<ClimbingRoute>> {
        let doc = match self.store.get(&paths::route(panel_type, route_id)).await {
            Ok(doc) => doc,
            Err(e) if e.is_degradable() => {
                tracing::warn!(panel_type, route_id, error = %e, "Route fetch failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(doc.and_then(|value| decode_route(route_id, value)))
    }

    /// Unsorted fetch of one panel's routes; backend errors degrade to an
    /// empty list.
    async fn fetch_panel_routes(&self, panel_type: &str) -> Result<Vec<ClimbingRoute>> {
        let entries = match self.store.get_all(&paths::routes_for_panel(panel_type)).await {
            Ok(entries) => entries,
            Err(e) if e.is_degradable() => {
                tracing::warn!(panel_type, error = %e, "Route listing failed, returning empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(entries
            .into_iter()
            .filter_map(|(key, value)| decode_route(&key, value))
            .collect())
    }

    // ─── Route Writes ────────────────────────────────────────────

    /// Create a route. When `route.id` is empty the store assigns a key,
    /// which is returned in the result.
    pub async fn create_route(&self, route: &ClimbingRoute) -> Result<ClimbingRoute> {
        route
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let doc = serde_json::to_value(route)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Route encode failed: {}", e)))?;

        let mut created = route.clone();
        if route.id.is_empty() {
            created.id = self
                .store
                .post(&paths::routes_for_panel(&route.panel_type), &doc)
                .await?;
        } else {
            self.store
                .put(&paths::route(&route.panel_type, &route.id), &doc)
                .await?;
        }

        tracing::info!(
            panel_type = %created.panel_type,
            route_id = %created.id,
            "Route created"
        );
        Ok(created)
    }

    /// Replace an existing route record.
    pub async fn update_route(&self, route: &ClimbingRoute) -> Result<()> {
        if route.id.is_empty() {
            return Err(AppError::BadRequest("route id is required".to_string()));
        }
        route
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let doc = serde_json::to_value(route)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Route encode failed: {}", e)))?;
        self.store
            .put(&paths::route(&route.panel_type, &route.id), &doc)
            .await
    }

    pub async fn delete_route(&self, panel_type: &str, route_id: &str) -> Result<()> {
        self.store.delete(&paths::route(panel_type, route_id)).await
    }
}

/// Decode one stored route, stamping the document key as its id.
/// Malformed documents are skipped with a warning.
pub(crate) fn decode_route(key: &str, value: Value) -> Option<ClimbingRoute> {
    match serde_json::from_value::<ClimbingRoute>(value) {
        Ok(mut route) => {
            route.id = key.to_string();
            Some(route)
        }
        Err(e) => {
            tracing::warn!(route_id = key, error = %e, "Skipping malformed route document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn route_doc(name: &str, difficulty: u8, panel: &str) -> Value {
        json!({
            "name": name,
            "color": "Rosso",
            "difficulty": difficulty,
            "panelType": panel,
            "createdDate": "2026-05-01T09:00:00Z",
            "isActive": true
        })
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put("routes/Verticale/r1", &route_doc("Spigolo", 5, "Verticale"))
            .await
            .unwrap();
        store
            .put("routes/Verticale/r2", &route_doc("Placca", 2, "Verticale"))
            .await
            .unwrap();
        store
            .put("routes/Strapiombo/r3", &route_doc("Tetto", 7, "Strapiombo"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_get_routes_single_panel_sorted_by_difficulty() {
        let repo = RouteRepository::new(seeded_store().await);
        let routes = repo.get_routes(Some("Verticale")).await.unwrap();

        let grades: Vec<u8> = routes.iter().map(|r| r.difficulty).collect();
        assert_eq!(grades, vec![2, 5]);
        assert_eq!(routes[0].id, "r2");
    }

    #[tokio::test]
    async fn test_get_routes_all_panels_merged_and_sorted() {
        let repo = RouteRepository::new(seeded_store().await);
        let routes = repo.get_routes(None).await.unwrap();

        let grades: Vec<u8> = routes.iter().map(|r| r.difficulty).collect();
        assert_eq!(grades, vec![2, 5, 7]);
    }

    #[tokio::test]
    async fn test_get_route_absent_is_none() {
        let repo = RouteRepository::new(seeded_store().await);
        assert!(repo.get_route("Verticale", "r1").await.unwrap().is_some());
        assert!(repo.get_route("Verticale", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_route_assigns_key_when_id_empty() {
        let store = Arc::new(MemoryStore::new());
        let repo = RouteRepository::new(store.clone());

        let route: ClimbingRoute =
            serde_json::from_value(route_doc("Nuova", 3, "Verticale")).unwrap();
        let created = repo.create_route(&route).await.unwrap();

        assert!(!created.id.is_empty());
        assert!(repo
            .get_route("Verticale", &created.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_create_route_rejects_invalid_difficulty() {
        let repo = RouteRepository::new(Arc::new(MemoryStore::new()));
        let route: ClimbingRoute =
            serde_json::from_value(route_doc("Fuori scala", 1, "Verticale")).unwrap();
        let route = ClimbingRoute {
            difficulty: 12,
            ..route
        };

        assert!(matches!(
            repo.create_route(&route).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_document_is_skipped() {
        let store = seeded_store().await;
        store
            .put("routes/Verticale/bad", &json!({"name": "broken"}))
            .await
            .unwrap();

        let repo = RouteRepository::new(store);
        let routes = repo.get_routes(Some("Verticale")).await.unwrap();
        assert_eq!(routes.len(), 2);
    }
}
