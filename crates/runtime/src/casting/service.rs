//! Drives every registered casting scheduler once per tick.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use sim_core::{ActionProvider, Actor, ActorId, FeedbackSink, FocusPolicy, Tick};

use super::{CastingDirectory, CastingHandle, CastingScheduler, TickRegistry, TickReport};
use crate::events::CastingEvent;

/// Owns the casting schedulers of all attached actors.
pub struct CastingService {
    schedulers: HashMap<ActorId, CastingScheduler>,
    registry: TickRegistry,
    directory: CastingDirectory,
    provider: Arc<dyn ActionProvider>,
    feedback: Arc<dyn FeedbackSink>,
    focus_policy: FocusPolicy,
}

impl CastingService {
    pub fn new(
        provider: Arc<dyn ActionProvider>,
        feedback: Arc<dyn FeedbackSink>,
        focus_policy: FocusPolicy,
    ) -> Self {
        Self {
            schedulers: HashMap::new(),
            registry: TickRegistry::new(),
            directory: CastingDirectory::new(),
            provider,
            feedback,
            focus_policy,
        }
    }

    /// Creates a scheduler for `owner` and returns its producer handle.
    ///
    /// Attaching an actor twice replaces the previous scheduler; handles to
    /// the old one stop accepting requests.
    pub fn attach(&mut self, owner: Arc<dyn Actor>) -> CastingHandle {
        let actor = owner.id();
        let (scheduler, handle) = CastingScheduler::new(
            owner,
            Arc::clone(&self.provider),
            Arc::clone(&self.feedback),
            self.registry.clone(),
            self.focus_policy,
        );
        self.directory.insert(actor, scheduler.state());
        if self.schedulers.insert(actor, scheduler).is_some() {
            debug!(target: "runtime::casting", actor = %actor, "replaced casting scheduler");
        }
        handle
    }

    pub fn detach(&mut self, actor: ActorId) -> bool {
        self.registry.deregister(actor);
        self.directory.remove(actor);
        self.schedulers.remove(&actor).is_some()
    }

    /// Ticks every registered actor exactly once, in id order.
    pub fn tick(&mut self, now: Tick) -> Vec<TickReport> {
        let actors = self.registry.snapshot();
        trace!(target: "runtime::casting", %now, registered = actors.len(), "casting tick");

        let mut reports = Vec::with_capacity(actors.len());
        for actor in actors {
            match self.schedulers.get_mut(&actor) {
                Some(scheduler) => reports.push(scheduler.tick(now)),
                None => {
                    self.registry.deregister(actor);
                }
            }
        }
        reports
    }

    pub fn interrupt(&mut self, actor: ActorId, now: Tick) -> bool {
        self.schedulers
            .get_mut(&actor)
            .is_some_and(|scheduler| scheduler.interrupt(now))
    }

    pub fn clear_slots(&mut self, actor: ActorId) {
        if let Some(scheduler) = self.schedulers.get_mut(&actor) {
            scheduler.clear_slots();
        }
    }

    pub fn drain_events(&mut self, actor: ActorId) -> Vec<CastingEvent> {
        self.schedulers
            .get_mut(&actor)
            .map(CastingScheduler::take_events)
            .unwrap_or_default()
    }

    pub fn scheduler(&self, actor: ActorId) -> Option<&CastingScheduler> {
        self.schedulers.get(&actor)
    }

    pub fn is_casting(&self, actor: ActorId) -> bool {
        self.scheduler(actor)
            .is_some_and(CastingScheduler::is_casting)
    }

    pub fn registry(&self) -> &TickRegistry {
        &self.registry
    }

    pub fn directory(&self) -> CastingDirectory {
        self.directory.clone()
    }
}
