use state_machine::{State, Transition};
use tracing::debug;

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainSettings, BrainState};

/// Entry state after spawn and revival.
///
/// Re-initializes the combat settings when flagged, then hands over to the
/// first matching shared rule or to Idle.
pub struct WakingUp {
    rules: BrainRules,
}

impl WakingUp {
    pub fn new() -> Self {
        Self {
            rules: rules::shared(),
        }
    }
}

impl Default for WakingUp {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for WakingUp {
    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        if ctx.needs_init {
            ctx.settings = BrainSettings::from_tuning(&ctx.tuning);
            ctx.needs_init = false;
            debug!(
                target: "runtime::brain",
                actor = %ctx.id(),
                aggro_range = ctx.settings.aggro_range,
                "brain settings initialized"
            );
            ctx.check_defensive_abilities();
        }

        let next = self
            .rules
            .evaluate(ctx, BrainState::WakingUp)
            .unwrap_or(BrainState::Idle);
        Transition::Goto(next)
    }
}
