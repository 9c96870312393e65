//! Producer-side access to an actor's casting scheduler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use sim_core::{
    AbilityId, AbilityRequest, ActionRequest, Actor, ActorEvent, ActorId, CastFailedReason,
    CastRequest, Spell, SpellLine,
};

use super::TickRegistry;

/// Casting flag published by the scheduler after every mutation.
#[derive(Debug, Default)]
pub struct CastState {
    casting: AtomicBool,
}

impl CastState {
    pub fn is_casting(&self) -> bool {
        self.casting.load(Ordering::Acquire)
    }

    pub(crate) fn set_casting(&self, casting: bool) {
        self.casting.store(casting, Ordering::Release);
    }
}

/// Cloneable, thread-safe entry point for submitting action requests.
///
/// Submitting never blocks: requests are appended to the owner's inbound
/// queue and the owner is registered with the tick registry. They are
/// admitted in arrival order on the next casting tick.
#[derive(Clone)]
pub struct CastingHandle {
    owner: Arc<dyn Actor>,
    tx: mpsc::UnboundedSender<ActionRequest>,
    registry: TickRegistry,
    state: Arc<CastState>,
}

impl CastingHandle {
    pub(crate) fn new(
        owner: Arc<dyn Actor>,
        tx: mpsc::UnboundedSender<ActionRequest>,
        registry: TickRegistry,
        state: Arc<CastState>,
    ) -> Self {
        Self {
            owner,
            tx,
            registry,
            state,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.owner.id()
    }

    /// Asks the owner to cast a spell.
    ///
    /// Returns false without enqueueing when the owner is stunned, mezzed,
    /// silenced or incapacitated. Crowd-controlled owners also receive one
    /// cast-failed notification per call.
    pub fn request_cast(&self, request: CastRequest) -> bool {
        let actor = self.owner.id();
        let status = self.owner.status();

        if status.is_crowd_controlled() {
            self.owner
                .notify(ActorEvent::CastFailed(CastFailedReason::CrowdControlled));
        }

        if !status.can_cast() {
            debug!(
                target: "runtime::casting",
                actor = %actor,
                spell = %request.spell.id,
                ?status,
                "cast request refused"
            );
            return false;
        }

        self.submit(ActionRequest::CastSpell(request))
    }

    /// Shorthand for [`request_cast`](Self::request_cast) without ability or
    /// pre-resolved target.
    pub fn cast(&self, spell: Arc<Spell>, line: SpellLine) -> bool {
        self.request_cast(CastRequest::new(spell, line))
    }

    /// Queues an ability. Validity is checked when it executes.
    pub fn request_ability(&self, ability: AbilityId) -> bool {
        self.submit(ActionRequest::UseAbility(AbilityRequest { ability }))
    }

    fn submit(&self, request: ActionRequest) -> bool {
        let actor = self.owner.id();
        let kind = request.kind();
        if self.tx.send(request).is_err() {
            warn!(
                target: "runtime::casting",
                actor = %actor,
                kind,
                "casting scheduler detached, request dropped"
            );
            return false;
        }
        self.registry.register(actor);
        true
    }

    /// Whether the owner had an active action at the end of its last update.
    pub fn is_casting(&self) -> bool {
        self.state.is_casting()
    }

    /// Returns false once the owning scheduler has been detached.
    pub fn is_attached(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl std::fmt::Debug for CastingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastingHandle")
            .field("actor", &self.owner.id())
            .field("casting", &self.state.is_casting())
            .finish()
    }
}

/// Read-only lookup of casting state across actors, used by behavior code
/// that needs to know whether group members are busy.
#[derive(Clone, Debug, Default)]
pub struct CastingDirectory {
    states: Arc<RwLock<HashMap<ActorId, Arc<CastState>>>>,
}

impl CastingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, actor: ActorId, state: Arc<CastState>) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor, state);
    }

    pub(crate) fn remove(&self, actor: ActorId) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&actor);
    }

    pub fn is_casting(&self, actor: ActorId) -> bool {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor)
            .is_some_and(|state| state.is_casting())
    }

    /// Returns true if any of `actors` other than `except` is casting.
    pub fn any_casting(&self, actors: &[ActorId], except: ActorId) -> bool {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        actors
            .iter()
            .filter(|&&actor| actor != except)
            .any(|actor| states.get(actor).is_some_and(|state| state.is_casting()))
    }
}
