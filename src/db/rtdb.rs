// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Realtime Database REST client.
//!
//! Every document lives at `{base_url}/{path}.json`; reads of absent
//! documents return JSON `null`, child creation is a POST whose response
//! body carries the generated key, and key listing uses `shallow=true`.

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Document store backed by the Realtime Database REST API.
#[derive(Clone)]
pub struct RtdbStore {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthProvider>,
}

/// Response body of a POST (child creation).
#[derive(serde::Deserialize)]
struct PostResponse {
    name: String,
}

impl RtdbStore {
    /// Create a client against the configured database instance.
    pub fn new(config: &Config, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.database_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build the request URL for `path`.
    ///
    /// Fails with `Unauthorized` before any request is issued when no auth
    /// token is available.
    fn url(&self, path: &str, shallow: bool) -> Result<String> {
        let token = self.auth.id_token().ok_or(AppError::Unauthorized)?;
        let mut url = format!("{}/{}.json?auth={}", self.base_url, path, token);
        if shallow {
            url.push_str("&shallow=true");
        }
        Ok(url)
    }

    /// Map a transport-level failure onto the error taxonomy.
    fn transport_error(err: reqwest::Error) -> AppError {
        AppError::Transport(err.to_string())
    }

    /// Check an HTTP status and decode the JSON body.
    async fn check_json(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AppError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(status.to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Transport(format!(
                "Document store returned {}",
                status
            )));
        }

        response.json().await.map_err(Self::transport_error)
    }
}

#[async_trait]
impl DocumentStore for RtdbStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let response = self
            .http
            .get(self.url(path, false)?)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body = self.check_json(response).await?;
        Ok(match body {
            Value::Null => None,
            doc => Some(doc),
        })
    }

    async fn get_all(&self, path: &str) -> Result<Vec<(String, Value)>> {
        let response = self
            .http
            .get(self.url(path, false)?)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body = self.check_json(response).await?;
        let mut entries: Vec<(String, Value)> = match body {
            Value::Object(map) => map.into_iter().collect(),
            _ => Vec::new(),
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn put(&self, path: &str, doc: &Value) -> Result<()> {
        let response = self
            .http
            .put(self.url(path, false)?)
            .json(doc)
            .send()
            .await
            .map_err(Self::transport_error)?;

        self.check_json(response).await?;
        Ok(())
    }

    async fn post(&self, path: &str, doc: &Value) -> Result<String> {
        let response = self
            .http
            .post(self.url(path, false)?)
            .json(doc)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body = self.check_json(response).await?;
        let created: PostResponse = serde_json::from_value(body).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Malformed create response: {}", e))
        })?;
        Ok(created.name)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(path, false)?)
            .send()
            .await
            .map_err(Self::transport_error)?;

        self.check_json(response).await?;
        Ok(())
    }

    async fn list_child_keys(&self, path: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url(path, true)?)
            .send()
            .await
            .map_err(Self::transport_error)?;

        // Shallow queries return `{key: true, ...}` instead of documents.
        let body = self.check_json(response).await?;
        let mut keys: Vec<String> = match body {
            Value::Object(map) => map.into_iter().map(|(k, _)| k).collect(),
            _ => Vec::new(),
        };
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Anonymous, StaticAuth};

    fn store_with(auth: Arc<dyn AuthProvider>) -> RtdbStore {
        RtdbStore::new(&Config::default(), auth).expect("client init")
    }

    #[test]
    fn test_url_carries_token() {
        let store = store_with(Arc::new(StaticAuth::new("u1", "secret")));
        let url = store.url("routes/Verticale", false).unwrap();
        assert_eq!(url, "http://localhost:9000/routes/Verticale.json?auth=secret");
    }

    #[test]
    fn test_shallow_flag() {
        let store = store_with(Arc::new(StaticAuth::new("u1", "secret")));
        let url = store.url("routes", true).unwrap();
        assert!(url.ends_with("&shallow=true"));
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let store = store_with(Arc::new(Anonymous));
        assert!(matches!(
            store.url("routes", false),
            Err(AppError::Unauthorized)
        ));
    }
}
