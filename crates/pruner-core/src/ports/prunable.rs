//! Prunable port - 剪定対象の抽象化

use async_trait::async_trait;

use crate::error::PruneError;

/// A cache (or anything holding reclaimable state) that can be pruned.
///
/// The pruner only triggers `prune`; what is evicted is the target's business.
/// It may be called many times and must not assume idempotence from the caller.
///
/// # 使用例
/// ```ignore
/// struct SessionCache { /* ... */ }
///
/// #[async_trait]
/// impl Prunable for SessionCache {
///     async fn prune(&self) -> Result<(), PruneError> {
///         self.evict_released_scopes().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Prunable: Send + Sync {
    async fn prune(&self) -> Result<(), PruneError>;

    /// Label used in logs and events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
