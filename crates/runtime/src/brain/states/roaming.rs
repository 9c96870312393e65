use state_machine::{State, Transition};
use tracing::trace;

use sim_core::Tick;

use crate::brain::rules::{self, BrainRules};
use crate::brain::{AmbientTrigger, BrainContext, BrainState};

/// Wanders around its spawn point with a cooldown between walks.
pub struct Roaming {
    rules: BrainRules,
    last_roam: Option<Tick>,
}

impl Roaming {
    pub fn new() -> Self {
        Self {
            rules: rules::group()
                .extend(&rules::tether())
                .extend(&rules::patrol())
                .extend(&rules::aggro()),
            last_roam: None,
        }
    }

    fn roam_chance(ctx: &BrainContext) -> u8 {
        match (ctx.settings.pvp_mode, ctx.settings.roam) {
            (true, true) => ctx.tuning.pvp_roam_chance,
            (true, false) => ctx.tuning.pvp_defend_chance,
            (false, _) => ctx.tuning.random_walk_chance,
        }
    }

    fn cooled_down(&self, ctx: &BrainContext) -> bool {
        self.last_roam
            .is_none_or(|last| ctx.now.since(last) >= ctx.tuning.roam_cooldown_ms)
    }
}

impl Default for Roaming {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for Roaming {
    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        if let Some(next) = self.rules.evaluate(ctx, BrainState::Roaming) {
            return Transition::Goto(next);
        }

        if !ctx.casting.is_casting() {
            let chance = Self::roam_chance(ctx);
            if !ctx.group_is_casting()
                && self.cooled_down(ctx)
                && ctx.roll_chance(chance)
                && !ctx.body.is_moving()
            {
                trace!(target: "runtime::brain", actor = %ctx.id(), chance, "random walk");
                ctx.body
                    .roam(ctx.body.max_speed(), ctx.settings.roaming_range);
                ctx.body.fire_ambient(AmbientTrigger::Roaming);
                self.last_roam = Some(ctx.now);
            }
        }

        ctx.cast_defensive();
        Transition::Stay
    }
}
