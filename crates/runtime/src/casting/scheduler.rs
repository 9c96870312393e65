//! Per-actor casting scheduler.
//!
//! Owns the consumer side of the actor's inbound queue and its two casting
//! slots. Only the simulation loop calls into it; producers go through
//! [`CastingHandle`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use sim_core::{
    ActionOutcome, ActionProvider, ActionRequest, Actor, ActorEvent, ActorId, Admission,
    AdmissionPolicy, Advance, Audience, CastError, CastFailedReason, CastRequest, CastSlots,
    Feedback, FeedbackSink, FocusPolicy, RunnableAction, SpellId, Tick,
};

use super::{CastState, CastingHandle, TickRegistry};
use crate::events::CastingEvent;

/// What one scheduler tick produced.
#[derive(Debug, Default)]
pub struct TickReport {
    pub actor: ActorId,
    pub at: Tick,
    /// Completed actions, in completion order.
    pub completed: Vec<ActionOutcome>,
    pub events: Vec<CastingEvent>,
    /// Whether the actor left the tick registry at the end of the tick.
    pub released: bool,
}

/// Casting state machine for one actor.
pub struct CastingScheduler {
    owner: Arc<dyn Actor>,
    provider: Arc<dyn ActionProvider>,
    feedback: Arc<dyn FeedbackSink>,
    focus_policy: FocusPolicy,
    inbound: mpsc::UnboundedReceiver<ActionRequest>,
    slots: CastSlots,
    registry: TickRegistry,
    state: Arc<CastState>,
    completed: Vec<ActionOutcome>,
    events: Vec<CastingEvent>,
}

impl CastingScheduler {
    /// Creates the scheduler for `owner` and the producer handle feeding it.
    pub fn new(
        owner: Arc<dyn Actor>,
        provider: Arc<dyn ActionProvider>,
        feedback: Arc<dyn FeedbackSink>,
        registry: TickRegistry,
        focus_policy: FocusPolicy,
    ) -> (Self, CastingHandle) {
        let (tx, inbound) = mpsc::unbounded_channel();
        let state = Arc::new(CastState::default());
        let handle = CastingHandle::new(
            Arc::clone(&owner),
            tx,
            registry.clone(),
            Arc::clone(&state),
        );
        let scheduler = Self {
            owner,
            provider,
            feedback,
            focus_policy,
            inbound,
            slots: CastSlots::new(),
            registry,
            state,
            completed: Vec::new(),
            events: Vec::new(),
        };
        (scheduler, handle)
    }

    pub fn actor(&self) -> ActorId {
        self.owner.id()
    }

    pub fn state(&self) -> Arc<CastState> {
        Arc::clone(&self.state)
    }

    pub fn is_casting(&self) -> bool {
        self.slots.active().is_some()
    }

    pub fn active(&self) -> Option<&dyn RunnableAction> {
        self.slots.active()
    }

    pub fn queued(&self) -> Option<&dyn RunnableAction> {
        self.slots.queued()
    }

    /// Number of requests waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Runs one tick: advance the active action, admit every pending request
    /// in arrival order, then leave the registry if nothing is left to do.
    pub fn tick(&mut self, now: Tick) -> TickReport {
        let actor = self.owner.id();

        match self.slots.advance(now) {
            Advance::Idle => {}
            Advance::Casting => {
                trace!(target: "runtime::casting", actor = %actor, %now, "casting");
            }
            Advance::Completed(done) => self.on_action_complete(done.as_ref(), now),
            Advance::Interrupted(aborted) => {
                let spell = aborted.spell().id;
                debug!(target: "runtime::casting", actor = %actor, %spell, "action aborted itself");
                self.owner.notify(ActorEvent::CastInterrupted(spell));
                self.events.push(CastingEvent::Interrupted {
                    actor,
                    spell,
                    at: now,
                });
            }
        }

        while let Ok(request) = self.inbound.try_recv() {
            self.resolve(request, now);
        }

        self.sync_state();

        let released = self
            .registry
            .release_if(actor, || self.slots.is_empty() && self.inbound.is_empty());
        if released {
            trace!(target: "runtime::casting", actor = %actor, %now, "released from tick registry");
            self.events.push(CastingEvent::Released { actor, at: now });
        }

        TickReport {
            actor,
            at: now,
            completed: std::mem::take(&mut self.completed),
            events: std::mem::take(&mut self.events),
            released,
        }
    }

    /// Settles the slots after the active action finished.
    ///
    /// The follow-up is promoted and started when the owner supports
    /// follow-up casting; otherwise both slots are emptied.
    pub fn on_action_complete(&mut self, finished: &dyn RunnableAction, now: Tick) {
        self.record_completion(finished, now);

        let follow_up = self.owner.supports_follow_up_casting();
        if self.slots.finish(follow_up, now)
            && let Some(next) = self.slots.active()
        {
            let spell = next.spell().id;
            self.owner.notify(ActorEvent::CastStarted(spell));
            self.events.push(CastingEvent::Started {
                actor: self.owner.id(),
                spell,
                at: now,
            });
        }
        self.sync_state();
    }

    /// Interrupts the active action and clears both slots.
    ///
    /// Only an interruptible action still in its casting phase is announced
    /// to nearby observers. Returns whether there was anything to clear.
    pub fn interrupt(&mut self, now: Tick) -> bool {
        let actor = self.owner.id();
        let announce = match self.slots.active() {
            Some(active) if !active.is_interruptible() => {
                debug!(
                    target: "runtime::casting",
                    actor = %actor,
                    spell = %active.spell().id,
                    "uninterruptible action cleared without announcement"
                );
                None
            }
            Some(active) if active.is_casting() => Some(active.spell().id),
            _ => None,
        };

        if let Some(spell) = announce {
            self.feedback
                .send(actor, Audience::Nearby, Feedback::Interrupted { spell });
            self.owner.notify(ActorEvent::CastInterrupted(spell));
            self.events.push(CastingEvent::Interrupted {
                actor,
                spell,
                at: now,
            });
        }

        let had_work = !self.slots.is_empty();
        self.slots.clear();
        self.sync_state();
        had_work
    }

    /// Drops both slots without any observer feedback.
    pub fn clear_slots(&mut self) {
        if !self.slots.is_empty() {
            self.slots.clear();
            self.events.push(CastingEvent::Cleared {
                actor: self.owner.id(),
            });
        }
        self.sync_state();
    }

    /// Takes events produced outside of [`tick`](Self::tick), such as by an
    /// interrupt.
    pub fn take_events(&mut self) -> Vec<CastingEvent> {
        std::mem::take(&mut self.events)
    }

    fn resolve(&mut self, request: ActionRequest, now: Tick) {
        match request {
            ActionRequest::UseAbility(request) => self.use_ability(request.ability),
            ActionRequest::CastSpell(request) => self.admit_cast(request, now),
        }
    }

    fn use_ability(&mut self, ability: sim_core::AbilityId) {
        let actor = self.owner.id();
        match self.owner.execute_ability(ability) {
            Ok(()) => self.events.push(CastingEvent::AbilityUsed { actor, ability }),
            Err(error) => {
                debug!(target: "runtime::casting", actor = %actor, %ability, %error, "ability failed");
                let reason = error.to_string();
                self.feedback.send(
                    actor,
                    Audience::Owner,
                    Feedback::AbilityFailed {
                        ability,
                        reason: reason.clone(),
                    },
                );
                self.events.push(CastingEvent::AbilityFailed {
                    actor,
                    ability,
                    reason,
                });
            }
        }
    }

    fn admit_cast(&mut self, request: CastRequest, now: Tick) {
        let actor = self.owner.id();
        let spell = request.spell.id;

        let action = match self.provider.build(self.owner.as_ref(), &request) {
            Ok(action) => action,
            Err(error) => {
                warn!(target: "runtime::casting", actor = %actor, %spell, %error, "discarding cast request");
                self.feedback.send(
                    actor,
                    Audience::Owner,
                    Feedback::CastFailed {
                        spell,
                        reason: CastFailedReason::InvalidRequest,
                    },
                );
                self.events.push(CastingEvent::Discarded {
                    actor,
                    spell,
                    reason: error.to_string(),
                });
                return;
            }
        };

        let policy = AdmissionPolicy {
            follow_up: self.owner.supports_follow_up_casting(),
            enforce_exclusivity: self.owner.enforces_cast_exclusivity(),
            focus: self.focus_policy,
        };

        match self.slots.admit(action, &policy, now) {
            Admission::Activated => {
                debug!(target: "runtime::casting", actor = %actor, %spell, "cast started");
                self.owner.notify(ActorEvent::CastStarted(spell));
                self.events.push(CastingEvent::Started {
                    actor,
                    spell,
                    at: now,
                });
            }
            Admission::Instant(done) => {
                if done.phase() == sim_core::ActionPhase::Complete {
                    self.record_completion(done.as_ref(), now);
                }
            }
            Admission::Preempted(previous) => {
                let previous = previous.spell().id;
                debug!(target: "runtime::casting", actor = %actor, %previous, %spell, "focus preempted");
                self.owner.notify(ActorEvent::CastStarted(spell));
                self.events.push(CastingEvent::Preempted {
                    actor,
                    previous,
                    spell,
                });
            }
            Admission::Queued { replaced } => {
                let replaced = replaced.map(|old| old.spell().id);
                debug!(target: "runtime::casting", actor = %actor, %spell, ?replaced, "queued as follow-up");
                self.feedback
                    .send(actor, Audience::Owner, Feedback::QueuedAsFollowUp { spell });
                self.events.push(CastingEvent::Queued {
                    actor,
                    spell,
                    replaced,
                });
            }
            Admission::Rejected(error) => {
                debug!(target: "runtime::casting", actor = %actor, %spell, %error, "cast rejected");
                self.feedback
                    .send(actor, Audience::Owner, rejection_feedback(spell, error));
                self.events.push(CastingEvent::Rejected {
                    actor,
                    spell,
                    error,
                });
            }
        }
    }

    fn record_completion(&mut self, finished: &dyn RunnableAction, now: Tick) {
        let actor = self.owner.id();
        let outcome = ActionOutcome::from_action(actor, finished, now);
        debug!(
            target: "runtime::casting",
            actor = %actor,
            spell = %outcome.spell.id,
            instant = outcome.was_instant(),
            "action complete"
        );
        self.owner.notify(ActorEvent::CastFinished(outcome.spell.id));
        self.owner.on_cast_complete(&outcome);
        self.events.push(CastingEvent::Completed {
            actor,
            spell: outcome.spell.id,
            target: outcome.target,
            instant: outcome.was_instant(),
            at: now,
        });
        self.completed.push(outcome);
    }

    fn sync_state(&self) {
        self.state.set_casting(self.slots.active().is_some());
    }
}

fn rejection_feedback(spell: SpellId, error: CastError) -> Feedback {
    match error {
        CastError::AlreadyCasting => Feedback::AlreadyCasting { spell },
        CastError::AlreadyPerforming => Feedback::AlreadyPerforming { spell },
        CastError::MustWait { remaining_ms } => Feedback::MustWait {
            spell,
            seconds: CastError::wait_seconds(remaining_ms),
        },
        CastError::Incapacitated => Feedback::CastFailed {
            spell,
            reason: CastFailedReason::CrowdControlled,
        },
    }
}

impl std::fmt::Debug for CastingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastingScheduler")
            .field("actor", &self.owner.id())
            .field("slots", &self.slots)
            .field("pending", &self.inbound.len())
            .finish_non_exhaustive()
    }
}
