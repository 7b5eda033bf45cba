//! CollectionSignal port - 回収パスの検知
//!
//! There is no tracing collector to hook, so whoever manages memory (an
//! arena reset, a cache sweep, a pool drain) publishes a monotonically
//! increasing epoch instead. The liveness probe only compares epochs.

/// Source of the reclamation epoch.
///
/// # Rules
/// - `epoch()` never decreases
/// - an unchanged epoch means no reclamation pass happened in between
pub trait CollectionSignal: Send + Sync {
    fn epoch(&self) -> u64;
}
