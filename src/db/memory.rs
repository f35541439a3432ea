// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store for tests and offline development.
//!
//! Keeps the whole database as one JSON tree. Generated keys are
//! deterministic and the store counts read/write operations so tests can
//! assert on backend traffic (cache hits, discarded sessions).

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    root: RwLock<Value>,
    next_key: AtomicU64,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read operations issued so far (get, get_all, list).
    pub fn read_ops(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Number of write operations issued so far (put, post, delete).
    pub fn write_ops(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn count_read(&self) {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn count_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn lookup(&self, path: &str) -> Option<Value> {
        let root = self.inner.root.read().expect("store lock poisoned");
        let mut node = &*root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.as_object()?.get(segment)?;
        }
        Some(node.clone())
    }

    fn insert(&self, path: &str, doc: Value) -> Result<()> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(AppError::BadRequest("empty store path".to_string()));
        }

        let mut root = self.inner.root.write().expect("store lock poisoned");
        if !root.is_object() {
            *root = Value::Object(Map::new());
        }

        let mut node = &mut *root;
        for segment in &segments[..segments.len() - 1] {
            let map = node.as_object_mut().expect("intermediate node is object");
            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
        }

        node.as_object_mut()
            .expect("parent node is object")
            .insert(segments[segments.len() - 1].to_string(), doc);
        Ok(())
    }

    fn remove(&self, path: &str) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut root = self.inner.root.write().expect("store lock poisoned");
        let mut node = &mut *root;
        for segment in parents {
            match node.as_object_mut().and_then(|m| m.get_mut(*segment)) {
                Some(child) => node = child,
                None => return,
            }
        }
        if let Some(map) = node.as_object_mut() {
            map.remove(*last);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.count_read();
        Ok(self.lookup(path))
    }

    async fn get_all(&self, path: &str) -> Result<Vec<(String, Value)>> {
        self.count_read();
        let mut entries: Vec<(String, Value)> = match self.lookup(path) {
            Some(Value::Object(map)) => map.into_iter().collect(),
            _ => Vec::new(),
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn put(&self, path: &str, doc: &Value) -> Result<()> {
        self.count_write();
        self.insert(path, doc.clone())
    }

    async fn post(&self, path: &str, doc: &Value) -> Result<String> {
        self.count_write();
        let seq = self.inner.next_key.fetch_add(1, Ordering::SeqCst);
        let key = format!("-K{:08}", seq);
        self.insert(&format!("{}/{}", path, key), doc.clone())?;
        Ok(key)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.count_write();
        self.remove(path);
        Ok(())
    }

    async fn list_child_keys(&self, path: &str) -> Result<Vec<String>> {
        self.count_read();
        let mut keys: Vec<String> = match self.lookup(path) {
            Some(Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
            _ => Vec::new(),
        };
        keys.sort();
        Ok(keys)
    }
}
