//! ScopedCache - スコープ単位のアクティベーションキャッシュ
//!
//! Remembers one value per scope object. Scopes are held weakly, so the cache
//! never keeps a scope alive; `prune` evicts entries whose scope is gone.

use std::any::Any;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::PruneError;
use crate::ports::Prunable;

type ScopeRef = Weak<dyn Any + Send + Sync>;

struct Entry<V> {
    scope: ScopeRef,
    value: V,
}

impl<V> Entry<V> {
    fn belongs_to<S>(&self, scope: &Arc<S>) -> bool {
        std::ptr::addr_eq(self.scope.as_ptr(), Arc::as_ptr(scope))
    }

    fn is_released(&self) -> bool {
        self.scope.strong_count() == 0
    }
}

/// # 使用例
/// ```ignore
/// let cache = Arc::new(ScopedCache::new("sessions"));
/// pruner.start(&cache).await?;
///
/// let request = Arc::new(RequestScope::new());
/// cache.remember(&request, session).await;
/// drop(request); // evicted by the next pass
/// ```
pub struct ScopedCache<V> {
    name: String,
    entries: Mutex<Vec<Entry<V>>>,
}

impl<V: Clone + Send + Sync> ScopedCache<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Stores `value` for `scope`, replacing any previous value.
    pub async fn remember<S: Any + Send + Sync>(&self, scope: &Arc<S>, value: V) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.belongs_to(scope)) {
            entry.value = value;
            return;
        }
        let weak = Arc::downgrade(scope) as ScopeRef;
        entries.push(Entry { scope: weak, value });
    }

    pub async fn try_get<S>(&self, scope: &Arc<S>) -> Option<V> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .find(|e| e.belongs_to(scope))
            .map(|e| e.value.clone())
    }

    /// Drops the entry for `scope`; returns whether one existed.
    pub async fn release<S>(&self, scope: &Arc<S>) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !e.belongs_to(scope));
        entries.len() != before
    }

    /// Drops every entry and returns how many there were.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let count = entries.len();
        entries.clear();
        count
    }

    /// Includes entries whose scope is already gone but not yet pruned.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl<V: Clone + Send + Sync> Prunable for ScopedCache<V> {
    async fn prune(&self) -> Result<(), PruneError> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !e.is_released());
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(cache = %self.name, evicted, remaining = entries.len(), "evicted released scopes");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
