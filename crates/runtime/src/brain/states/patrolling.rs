use state_machine::{State, Transition};

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainState};

/// Follows the body's patrol path.
pub struct Patrolling {
    rules: BrainRules,
}

impl Patrolling {
    pub fn new() -> Self {
        Self {
            rules: rules::tether().extend(&rules::aggro()),
        }
    }
}

impl Default for Patrolling {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for Patrolling {
    fn enter(&mut self, ctx: &mut BrainContext) {
        ctx.clear_hostility();
        ctx.body.move_on_path(ctx.body.max_speed());
    }

    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        match self.rules.evaluate(ctx, BrainState::Patrolling) {
            Some(next) => Transition::Goto(next),
            None => Transition::Stay,
        }
    }

    fn exit(&mut self, ctx: &mut BrainContext) {
        ctx.body.stop_moving();
    }
}
