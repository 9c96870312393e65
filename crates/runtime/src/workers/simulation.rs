//! Simulation worker that owns every scheduler, brain and effect list.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), advances
//! game time on request and publishes what happened to the EventBus.
//!
//! One step runs, in order: every brain (by actor id), every registered
//! casting scheduler, then the effect pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use sim_core::{
    Actor, ActorId, RngOracle, RunnableAction, SimConfig, SpellId, StatKind, Tick,
};

use crate::api::{Result, RuntimeError};
use crate::brain::{Body, Brain, BrainContext, BrainHook, BrainState};
use crate::casting::{CastingHandle, CastingService};
use crate::effects::EffectPipeline;
use crate::events::{BrainEvent, EventBus};

/// Commands that can be sent to the simulation worker.
pub enum Command {
    /// Create a casting scheduler for an actor without a brain.
    Attach {
        actor: Arc<dyn Actor>,
        reply: oneshot::Sender<Result<CastingHandle>>,
    },
    /// Create a casting scheduler and a brain driving it.
    AttachBrain {
        actor: Arc<dyn Actor>,
        body: Arc<dyn Body>,
        hooks: Vec<Arc<dyn BrainHook>>,
        reply: oneshot::Sender<Result<CastingHandle>>,
    },
    Detach {
        actor: ActorId,
        reply: oneshot::Sender<bool>,
    },
    /// Advance the clock by `ticks` intervals.
    Step {
        ticks: u32,
        reply: oneshot::Sender<Tick>,
    },
    Interrupt {
        actor: ActorId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Death signal: the brain goes to Dead and both casting slots empty.
    Kill {
        actor: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Revival signal: a dead brain starts over from Waking-Up.
    Revive {
        actor: ActorId,
        reply: oneshot::Sender<Result<bool>>,
    },
    AddHostility {
        actor: ActorId,
        attacker: ActorId,
        amount: u64,
        reply: oneshot::Sender<Result<()>>,
    },
    CancelEffect {
        owner: ActorId,
        spell: SpellId,
        reply: oneshot::Sender<()>,
    },
    QueryActor {
        actor: ActorId,
        reply: oneshot::Sender<Option<ActorSnapshot>>,
    },
    Now {
        reply: oneshot::Sender<Tick>,
    },
}

/// Read-only view of one actor's runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub at: Tick,
    pub brain_state: Option<BrainState>,
    pub active: Option<SpellId>,
    pub queued: Option<SpellId>,
    /// Whether the casting scheduler is in the tick registry.
    pub registered: bool,
    pub hostility: Vec<(ActorId, u64)>,
    pub bonuses: BTreeMap<StatKind, i32>,
}

impl ActorSnapshot {
    pub fn is_casting(&self) -> bool {
        self.active.is_some()
    }
}

/// Background task that advances the simulation.
pub struct SimulationWorker {
    clock: Tick,
    config: SimConfig,
    casting: CastingService,
    brains: BTreeMap<ActorId, Brain>,
    effects: EffectPipeline,
    rng: Arc<dyn RngOracle>,
    seed: u64,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        config: SimConfig,
        casting: CastingService,
        rng: Arc<dyn RngOracle>,
        seed: u64,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            tick_interval_ms = config.tick_interval_ms,
            focus_policy = %config.focus_policy,
            seed,
            "SimulationWorker initialized"
        );

        Self {
            clock: Tick::ZERO,
            config,
            casting,
            brains: BTreeMap::new(),
            effects: EffectPipeline::new(),
            rng,
            seed,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!(target: "runtime::worker", now = %self.clock, "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Attach { actor, reply } => {
                let handle = self.attach(actor);
                if reply.send(handle).is_err() {
                    debug!(target: "runtime::worker", "Attach reply channel closed (caller dropped)");
                }
            }
            Command::AttachBrain {
                actor,
                body,
                hooks,
                reply,
            } => {
                let result = self.attach_brain(actor, body, hooks);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "AttachBrain reply channel closed (caller dropped)");
                }
            }
            Command::Detach { actor, reply } => {
                let detached = self.detach(actor);
                if reply.send(detached).is_err() {
                    debug!(target: "runtime::worker", "Detach reply channel closed (caller dropped)");
                }
            }
            Command::Step { ticks, reply } => {
                for _ in 0..ticks {
                    self.step();
                }
                if reply.send(self.clock).is_err() {
                    debug!(target: "runtime::worker", "Step reply channel closed (caller dropped)");
                }
            }
            Command::Interrupt { actor, reply } => {
                let result = self.interrupt(actor);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Interrupt reply channel closed (caller dropped)");
                }
            }
            Command::Kill { actor, reply } => {
                let result = self.kill(actor);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Kill reply channel closed (caller dropped)");
                }
            }
            Command::Revive { actor, reply } => {
                let result = self.revive(actor);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Revive reply channel closed (caller dropped)");
                }
            }
            Command::AddHostility {
                actor,
                attacker,
                amount,
                reply,
            } => {
                let result = match self.brains.get_mut(&actor) {
                    Some(brain) => {
                        brain.add_hostility(attacker, amount);
                        Ok(())
                    }
                    None => Err(RuntimeError::UnknownActor(actor)),
                };
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "AddHostility reply channel closed (caller dropped)");
                }
            }
            Command::CancelEffect {
                owner,
                spell,
                reply,
            } => {
                self.effects.cancel(owner, spell);
                if reply.send(()).is_err() {
                    debug!(target: "runtime::worker", "CancelEffect reply channel closed (caller dropped)");
                }
            }
            Command::QueryActor { actor, reply } => {
                if reply.send(self.snapshot(actor)).is_err() {
                    debug!(target: "runtime::worker", "QueryActor reply channel closed (caller dropped)");
                }
            }
            Command::Now { reply } => {
                if reply.send(self.clock).is_err() {
                    debug!(target: "runtime::worker", "Now reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// A second attach would orphan the handle a brain or client already
    /// holds, so an id stays bound to its first scheduler until detached.
    fn attach(&mut self, actor: Arc<dyn Actor>) -> Result<CastingHandle> {
        let id = actor.id();
        if self.casting.scheduler(id).is_some() || self.brains.contains_key(&id) {
            debug!(target: "runtime::worker", actor = %id, "attach refused: already attached");
            return Err(RuntimeError::AlreadyAttached(id));
        }
        self.effects.attach(id);
        debug!(target: "runtime::worker", actor = %id, "actor attached");
        Ok(self.casting.attach(actor))
    }

    fn attach_brain(
        &mut self,
        actor: Arc<dyn Actor>,
        body: Arc<dyn Body>,
        hooks: Vec<Arc<dyn BrainHook>>,
    ) -> Result<CastingHandle> {
        let id = actor.id();
        let handle = self.attach(actor)?;
        let ctx = BrainContext::new(
            body,
            handle.clone(),
            self.casting.directory(),
            self.config.brain.clone(),
            Arc::clone(&self.rng),
            self.seed,
        );
        let brain = match Brain::new(ctx, hooks) {
            Ok(brain) => brain,
            Err(err) => {
                self.detach(id);
                return Err(err.into());
            }
        };
        self.brains.insert(id, brain);
        Ok(handle)
    }

    fn detach(&mut self, actor: ActorId) -> bool {
        let had_brain = self.brains.remove(&actor).is_some();
        self.effects.detach(actor);
        let had_scheduler = self.casting.detach(actor);
        debug!(target: "runtime::worker", %actor, had_brain, had_scheduler, "actor detached");
        had_brain || had_scheduler
    }

    fn interrupt(&mut self, actor: ActorId) -> Result<bool> {
        if self.casting.scheduler(actor).is_none() {
            return Err(RuntimeError::UnknownActor(actor));
        }
        let interrupted = self.casting.interrupt(actor, self.clock);
        self.flush_casting_events(actor);
        Ok(interrupted)
    }

    fn kill(&mut self, actor: ActorId) -> Result<()> {
        let known = self.casting.scheduler(actor).is_some() || self.brains.contains_key(&actor);
        if !known {
            return Err(RuntimeError::UnknownActor(actor));
        }

        self.casting.clear_slots(actor);
        self.flush_casting_events(actor);

        if let Some(brain) = self.brains.get_mut(&actor)
            && let Some(change) = brain.on_death(self.clock)
        {
            self.event_bus.publish(BrainEvent::Transition {
                actor,
                from: change.from,
                to: change.to,
                at: self.clock,
            });
        }
        info!(target: "runtime::worker", %actor, now = %self.clock, "actor died");
        self.event_bus.publish(BrainEvent::Died {
            actor,
            at: self.clock,
        });
        Ok(())
    }

    fn revive(&mut self, actor: ActorId) -> Result<bool> {
        let brain = self
            .brains
            .get_mut(&actor)
            .ok_or(RuntimeError::UnknownActor(actor))?;
        let Some(change) = brain.revive(self.clock) else {
            return Ok(false);
        };

        self.event_bus.publish(BrainEvent::Transition {
            actor,
            from: change.from,
            to: change.to,
            at: self.clock,
        });
        info!(target: "runtime::worker", %actor, now = %self.clock, "actor revived");
        self.event_bus.publish(BrainEvent::Revived {
            actor,
            at: self.clock,
        });
        Ok(true)
    }

    /// Publishes events an out-of-tick call left on the scheduler.
    fn flush_casting_events(&mut self, actor: ActorId) {
        for event in self.casting.drain_events(actor) {
            self.event_bus.publish(event);
        }
    }

    /// Advances the clock by one interval and runs every subsystem once.
    fn step(&mut self) {
        self.clock += self.config.tick_interval_ms;
        let now = self.clock;
        trace!(target: "runtime::worker", %now, "step");

        for (actor, brain) in &mut self.brains {
            if let Some(change) = brain.think(now) {
                debug!(
                    target: "runtime::brain",
                    %actor,
                    from = %change.from,
                    to = %change.to,
                    "state transition"
                );
                self.event_bus.publish(BrainEvent::Transition {
                    actor: *actor,
                    from: change.from,
                    to: change.to,
                    at: now,
                });
            }
        }

        for report in self.casting.tick(now) {
            for outcome in &report.completed {
                self.effects.on_outcome(outcome, now);
            }
            for event in report.events {
                self.event_bus.publish(event);
            }
        }

        for event in self.effects.tick(now) {
            self.event_bus.publish(event);
        }
    }

    fn snapshot(&self, actor: ActorId) -> Option<ActorSnapshot> {
        let scheduler = self.casting.scheduler(actor);
        let brain = self.brains.get(&actor);
        if scheduler.is_none() && brain.is_none() {
            return None;
        }

        let spell_of = |action: &dyn RunnableAction| action.spell().id;
        Some(ActorSnapshot {
            id: actor,
            at: self.clock,
            brain_state: brain.map(Brain::state),
            active: scheduler.and_then(|s| s.active()).map(spell_of),
            queued: scheduler.and_then(|s| s.queued()).map(spell_of),
            registered: self.casting.registry().contains(actor),
            hostility: brain
                .map(|b| b.context().hostility.iter().collect())
                .unwrap_or_default(),
            bonuses: self
                .effects
                .effects(actor)
                .map(|list| list.bonuses().clone())
                .unwrap_or_default(),
        })
    }
}
