use state_machine::{State, Transition};

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainState};

/// Walks home with a clean hostility table.
pub struct ReturnToSpawn {
    rules: BrainRules,
}

impl ReturnToSpawn {
    pub fn new() -> Self {
        Self {
            rules: rules::aggro(),
        }
    }
}

impl Default for ReturnToSpawn {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for ReturnToSpawn {
    fn enter(&mut self, ctx: &mut BrainContext) {
        if ctx.body.was_stealthed() {
            ctx.body.set_stealth(true);
        }
        ctx.clear_hostility();
        ctx.body.return_to_spawn(ctx.tuning.return_speed);
    }

    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        let stationary = !ctx.body.is_returning_to_spawn() && ctx.body.current_speed() == 0;
        let near_home = ctx.body.is_near_spawn(ctx.tuning.near_spawn_radius);
        let disengaged = !ctx.has_aggro() || !ctx.body.is_engaging();

        if stationary && (near_home || disengaged) {
            ctx.body.turn_to(ctx.body.spawn_heading());
            return Transition::Goto(BrainState::WakingUp);
        }

        match self.rules.evaluate(ctx, BrainState::ReturnToSpawn) {
            Some(next) => Transition::Goto(next),
            None => Transition::Stay,
        }
    }
}
