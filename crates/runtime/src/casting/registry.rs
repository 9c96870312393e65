//! Set of actors with pending casting work.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sim_core::ActorId;

/// Tracks which actors the casting service must tick.
///
/// Registration is idempotent: an actor registered twice is still ticked
/// once. The set is ordered so every tick visits actors in id order.
#[derive(Clone, Debug, Default)]
pub struct TickRegistry {
    actors: Arc<Mutex<BTreeSet<ActorId>>>,
}

impl TickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<ActorId>> {
        self.actors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if the actor was not registered before.
    pub fn register(&self, actor: ActorId) -> bool {
        self.lock().insert(actor)
    }

    /// Returns true if the actor was registered.
    pub fn deregister(&self, actor: ActorId) -> bool {
        self.lock().remove(&actor)
    }

    /// Deregisters `actor` if `idle` holds, evaluated under the registry lock.
    ///
    /// Producers register after enqueueing, so a request that lands between
    /// the owner's drain and this check either makes `idle` false or
    /// re-registers the actor right after.
    pub fn release_if(&self, actor: ActorId, idle: impl FnOnce() -> bool) -> bool {
        let mut actors = self.lock();
        if idle() { actors.remove(&actor) } else { false }
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.lock().contains(&actor)
    }

    /// Registered actors in id order.
    pub fn snapshot(&self) -> Vec<ActorId> {
        self.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let registry = TickRegistry::new();
        assert!(registry.register(ActorId(2)));
        assert!(!registry.register(ActorId(2)));
        registry.register(ActorId(1));
        assert_eq!(registry.snapshot(), vec![ActorId(1), ActorId(2)]);
    }

    #[test]
    fn release_only_when_idle() {
        let registry = TickRegistry::new();
        registry.register(ActorId(1));

        assert!(!registry.release_if(ActorId(1), || false));
        assert!(registry.contains(ActorId(1)));

        assert!(registry.release_if(ActorId(1), || true));
        assert!(!registry.contains(ActorId(1)));
        assert!(!registry.deregister(ActorId(1)));
    }
}
