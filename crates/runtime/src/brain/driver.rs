use std::sync::Arc;

use state_machine::{BuildError, Change};
use tracing::debug;

use sim_core::{ActorId, Tick};

use super::states::{BrainMachine, standard_table};
use super::{BrainContext, BrainHook, BrainState};

/// One actor's behavior: the state table, its blackboard and content hooks.
pub struct Brain {
    machine: BrainMachine,
    ctx: BrainContext,
    hooks: Vec<Arc<dyn BrainHook>>,
}

impl Brain {
    pub fn new(
        ctx: BrainContext,
        hooks: Vec<Arc<dyn BrainHook>>,
    ) -> Result<Self, BuildError<BrainState>> {
        Ok(Self {
            machine: standard_table()?,
            ctx,
            hooks,
        })
    }

    pub fn id(&self) -> ActorId {
        self.ctx.id()
    }

    pub fn state(&self) -> BrainState {
        self.machine.current()
    }

    pub fn context(&self) -> &BrainContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut BrainContext {
        &mut self.ctx
    }

    pub fn transitions(&self) -> u64 {
        self.machine.transitions()
    }

    pub fn is_dead(&self) -> bool {
        self.machine.current() == BrainState::Dead
    }

    /// Evaluates hooks and then the current state once.
    ///
    /// At most one transition happens per call. A dead brain does not
    /// think at all; only [`revive`](Self::revive) moves it on.
    pub fn think(&mut self, now: Tick) -> Option<Change<BrainState>> {
        self.ctx.begin_tick(now);
        self.machine.start(&mut self.ctx);

        let current = self.machine.current();
        if current == BrainState::Dead {
            return None;
        }
        for hook in &self.hooks {
            if let Some(next) = hook.before_think(&mut self.ctx, current)
                && next != current
            {
                debug!(
                    target: "runtime::brain",
                    actor = %self.ctx.id(),
                    hook = hook.name(),
                    from = %current,
                    to = %next,
                    "hook forced transition"
                );
                return self.machine.transition(&mut self.ctx, next);
            }
        }

        self.machine.tick(&mut self.ctx)
    }

    /// Death signal; overrides whatever the current state would decide.
    pub fn on_death(&mut self, now: Tick) -> Option<Change<BrainState>> {
        self.ctx.begin_tick(now);
        self.machine.transition(&mut self.ctx, BrainState::Dead)
    }

    /// Revival signal. Returns `None` unless the brain was dead.
    pub fn revive(&mut self, now: Tick) -> Option<Change<BrainState>> {
        if !self.is_dead() {
            return None;
        }
        self.ctx.begin_tick(now);
        self.machine.transition(&mut self.ctx, BrainState::WakingUp)
    }

    /// Records hostility caused by someone attacking this actor. Ignored
    /// while dead.
    pub fn add_hostility(&mut self, attacker: ActorId, amount: u64) {
        if !self.is_dead() {
            self.ctx.hostility.add(attacker, amount);
        }
    }
}

impl std::fmt::Debug for Brain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Brain")
            .field("state", &self.machine.current())
            .field("ctx", &self.ctx)
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}
