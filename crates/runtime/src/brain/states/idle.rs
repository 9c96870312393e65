use state_machine::{State, Transition};

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainState};

/// Stands around. Leaves on any shared rule, otherwise buffs and rests.
pub struct Idle {
    rules: BrainRules,
}

impl Idle {
    pub fn new() -> Self {
        Self {
            rules: rules::shared(),
        }
    }
}

impl Default for Idle {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for Idle {
    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        if let Some(next) = self.rules.evaluate(ctx, BrainState::Idle) {
            return Transition::Goto(next);
        }
        ctx.rest_or_recover();
        Transition::Stay
    }
}
