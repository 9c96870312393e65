use state_machine::{State, Transition};
use tracing::debug;

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainState};

/// Holds a group camp point.
///
/// On entry the spawn anchor moves to a jittered spot around the camp point
/// so members do not stack on one coordinate.
pub struct Camp {
    rules: BrainRules,
}

impl Camp {
    pub fn new() -> Self {
        Self {
            rules: rules::aggro(),
        }
    }
}

impl Default for Camp {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for Camp {
    fn enter(&mut self, ctx: &mut BrainContext) {
        let Some(camp_point) = ctx.group().and_then(|group| group.camp_point) else {
            return;
        };

        let dungeon = ctx.body.in_dungeon();
        let (radius, range) = if dungeon {
            (
                ctx.tuning.dungeon_camp_jitter,
                ctx.tuning.dungeon_camp_aggro_range,
            )
        } else {
            (ctx.tuning.outdoor_camp_jitter, ctx.tuning.group_aggro_range)
        };
        ctx.settings.aggro_range = range;

        let dx = ctx.jitter(radius);
        let dy = ctx.jitter(radius);
        let anchor = camp_point.offset(dx, dy);
        debug!(target: "runtime::brain", actor = %ctx.id(), ?anchor, "taking camp position");
        ctx.body.set_spawn_point(anchor);

        if ctx.body.was_stealthed() {
            ctx.body.set_stealth(true);
        }
        ctx.clear_hostility();
        ctx.body.return_to_spawn(ctx.tuning.return_speed);
    }

    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        if ctx.group().and_then(|group| group.camp_point).is_none() {
            return Transition::Goto(BrainState::WakingUp);
        }
        if let Some(next) = self.rules.evaluate(ctx, BrainState::Camp) {
            return Transition::Goto(next);
        }
        ctx.rest_or_recover();
        Transition::Stay
    }
}
