//! PruneRegistry - 剪定対象の登録
//!
//! Ordered, append-only between clears, no deduplication. Holds targets
//! weakly: the owner decides how long a target lives.

use std::sync::Weak;

use crate::ports::Prunable;

#[derive(Default)]
pub struct PruneRegistry {
    targets: Vec<Weak<dyn Prunable>>,
}

impl PruneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `target`. Registering the same target twice keeps both entries.
    pub fn push(&mut self, target: Weak<dyn Prunable>) {
        self.targets.push(target);
    }

    /// Targets in registration order.
    pub fn snapshot(&self) -> Vec<Weak<dyn Prunable>> {
        self.targets.clone()
    }

    /// Drops entries whose owner released the target; returns how many.
    pub fn compact(&mut self) -> usize {
        let before = self.targets.len();
        self.targets.retain(|t| t.strong_count() > 0);
        before - self.targets.len()
    }

    /// Empties the registry and returns how many entries were discarded.
    pub fn clear(&mut self) -> usize {
        let count = self.targets.len();
        self.targets.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::error::PruneError;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Prunable for Noop {
        async fn prune(&self) -> Result<(), PruneError> {
            Ok(())
        }
    }

    fn weak(target: &Arc<Noop>) -> Weak<dyn Prunable> {
        Arc::downgrade(target) as Weak<dyn Prunable>
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let a = Arc::new(Noop);
        let b = Arc::new(Noop);
        let mut registry = PruneRegistry::new();
        registry.push(weak(&a));
        registry.push(weak(&b));
        registry.push(weak(&a));

        let snapshot = registry.snapshot();
        assert_eq!(registry.len(), 3);
        assert!(std::ptr::addr_eq(snapshot[0].as_ptr(), Arc::as_ptr(&a)));
        assert!(std::ptr::addr_eq(snapshot[1].as_ptr(), Arc::as_ptr(&b)));
        assert!(std::ptr::addr_eq(snapshot[2].as_ptr(), Arc::as_ptr(&a)));
    }

    #[test]
    fn compact_drops_released_targets() {
        let kept = Arc::new(Noop);
        let released = Arc::new(Noop);
        let mut registry = PruneRegistry::new();
        registry.push(weak(&kept));
        registry.push(weak(&released));
        drop(released);

        assert_eq!(registry.compact(), 1);
        assert_eq!(registry.len(), 1);
        assert!(std::ptr::addr_eq(registry.snapshot()[0].as_ptr(), Arc::as_ptr(&kept)));
    }

    #[test]
    fn clear_reports_discarded_count() {
        let a = Arc::new(Noop);
        let mut registry = PruneRegistry::new();
        registry.push(weak(&a));
        registry.push(weak(&a));

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
    }
}
