use bevy::prelude::*;
use rustc_hash::FxHashMap;

use super::latch::ProximityLatch;

/// Tracked agent pairs and their latches.
///
/// Pairs are unordered: `(a, b)` and `(b, a)` are the same entry.
#[derive(Resource, Debug, Default)]
pub struct ProximityRegistry {
    pairs: FxHashMap<(Entity, Entity), ProximityLatch>,
}

fn pair_key(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b { (a, b) } else { (b, a) }
}

impl ProximityRegistry {
    /// Start tracking a pair. Returns `false` for a self-pair or a pair that
    /// is already tracked (its latch is kept as is).
    pub fn register(&mut self, a: Entity, b: Entity) -> bool {
        if a == b {
            return false;
        }
        let key = pair_key(a, b);
        if self.pairs.contains_key(&key) {
            return false;
        }
        self.pairs.insert(key, ProximityLatch::default());
        true
    }

    pub fn latch(&self, a: Entity, b: Entity) -> Option<&ProximityLatch> {
        self.pairs.get(&pair_key(a, b))
    }

    pub fn is_synced(&self, a: Entity, b: Entity) -> bool {
        self.latch(a, b).is_some_and(|latch| latch.synced)
    }

    /// Stop tracking every pair that involves `entity`.
    pub fn forget(&mut self, entity: Entity) {
        self.pairs.retain(|&(a, b), _| a != entity && b != entity);
    }

    /// Pairs in a stable order, so messages come out the same way every run.
    pub fn sorted_pairs(&self) -> Vec<(Entity, Entity)> {
        let mut keys: Vec<_> = self.pairs.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn latch_mut(&mut self, a: Entity, b: Entity) -> Option<&mut ProximityLatch> {
        self.pairs.get_mut(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_unordered_and_unique() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut registry = ProximityRegistry::default();
        assert!(registry.register(a, b));
        assert!(!registry.register(b, a), "same pair the other way round");
        assert!(!registry.register(a, a), "self pairs are rejected");
        assert_eq!(registry.len(), 1);
        assert!(registry.latch(b, a).is_some());
    }

    #[test]
    fn test_reregistering_keeps_latch_state() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut registry = ProximityRegistry::default();
        registry.register(a, b);
        if let Some(latch) = registry.latch_mut(a, b) {
            latch.synced = true;
        }
        registry.register(b, a);
        assert!(registry.is_synced(a, b));
    }

    #[test]
    fn test_forget_drops_every_pair_with_entity() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();

        let mut registry = ProximityRegistry::default();
        registry.register(a, b);
        registry.register(a, c);
        registry.register(b, c);
        registry.forget(a);

        assert_eq!(registry.sorted_pairs(), vec![pair_key(b, c)]);
    }
}
