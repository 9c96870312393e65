use state_machine::{State, Transition};

use crate::brain::{BrainContext, BrainState};

/// Entered through the death signal only and left through the revival
/// signal, which goes back through Waking-Up to re-initialize the settings.
pub struct Dead;

impl State<BrainState, BrainContext> for Dead {
    fn enter(&mut self, ctx: &mut BrainContext) {
        ctx.clear_hostility();
        ctx.needs_init = true;
    }

    fn think(&mut self, _ctx: &mut BrainContext) -> Transition<BrainState> {
        Transition::Stay
    }
}
