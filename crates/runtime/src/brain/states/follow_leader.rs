use state_machine::{State, Transition};
use tracing::trace;

use sim_core::ActorId;

use crate::brain::rules::{self, BrainRules};
use crate::brain::{BrainContext, BrainState};

/// Trails the group leader.
///
/// Entering narrows the aggro range to the group range outside PvP. Leaving
/// always restores the wide range, PvP or not, so an actor dropped from its
/// group scans like a solo actor until Waking-Up re-initializes it.
pub struct FollowLeader {
    rules: BrainRules,
}

impl FollowLeader {
    pub fn new() -> Self {
        Self {
            rules: rules::camp().extend(&rules::aggro()),
        }
    }

    fn leader(ctx: &BrainContext) -> Option<ActorId> {
        let actor = ctx.id();
        ctx.group()
            .filter(|group| !group.is_leader(actor))
            .map(|group| group.leader)
    }

    fn follower_range(ctx: &BrainContext) -> u32 {
        if ctx.settings.pvp_mode {
            ctx.tuning.wide_aggro_range
        } else {
            ctx.tuning.group_aggro_range
        }
    }
}

impl Default for FollowLeader {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for FollowLeader {
    fn enter(&mut self, ctx: &mut BrainContext) {
        if let Some(leader) = Self::leader(ctx) {
            trace!(target: "runtime::brain", actor = %ctx.id(), %leader, "following leader");
            ctx.body.follow(leader);
        }
        ctx.settings.aggro_range = Self::follower_range(ctx);
    }

    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        let Some(leader) = Self::leader(ctx) else {
            return Transition::Goto(BrainState::Idle);
        };

        if let Some(next) = self.rules.evaluate(ctx, BrainState::FollowLeader) {
            return Transition::Goto(next);
        }

        if ctx.body.follow_target() != Some(leader) {
            ctx.body.follow(leader);
        }
        ctx.rest_or_recover();
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut BrainContext) {
        ctx.body.stop_following();
        ctx.settings.aggro_range = ctx.tuning.wide_aggro_range;
    }
}
