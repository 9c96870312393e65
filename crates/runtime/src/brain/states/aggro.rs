use state_machine::{State, Transition};
use tracing::debug;

use sim_core::Tick;

use crate::brain::{AmbientTrigger, BrainContext, BrainState};

/// Fights the most hated actor until the table empties or the actor has been
/// out of combat for the grace window.
pub struct Aggro {
    entered_at: Tick,
}

impl Aggro {
    pub fn new() -> Self {
        Self {
            entered_at: Tick::ZERO,
        }
    }

    fn disengaged(&self, ctx: &BrainContext) -> bool {
        let grace = ctx.tuning.aggro_grace_ms;
        !ctx.has_aggro()
            || (!ctx.body.in_combat_within(ctx.now, grace)
                && ctx.now.since(self.entered_at) >= grace)
    }

    /// Where to go once the fight is over.
    ///
    /// A camp point always wins and followers go back to their leader. In
    /// PvP a leader or solo actor roams on, walks back to defend its spawn,
    /// or holds position when neither mode is set. Outside PvP a leader idles
    /// and a solo actor walks home.
    fn exit_target(ctx: &BrainContext) -> BrainState {
        let actor = ctx.id();
        let group = ctx.group();

        if group.as_ref().is_some_and(|group| group.camp_point.is_some()) {
            return BrainState::Camp;
        }
        if let Some(group) = &group
            && !group.is_leader(actor)
        {
            return BrainState::FollowLeader;
        }

        let settings = &ctx.settings;
        match group {
            _ if settings.pvp_mode && settings.roam => BrainState::Roaming,
            _ if settings.pvp_mode && settings.defend => BrainState::ReturnToSpawn,
            _ if settings.pvp_mode => BrainState::Idle,
            Some(_) => BrainState::Idle,
            None => BrainState::ReturnToSpawn,
        }
    }
}

impl Default for Aggro {
    fn default() -> Self {
        Self::new()
    }
}

impl State<BrainState, BrainContext> for Aggro {
    fn enter(&mut self, ctx: &mut BrainContext) {
        self.entered_at = ctx.now;
        if ctx.body.is_sitting() {
            ctx.body.sit(false);
        }
        ctx.body.fire_ambient(AmbientTrigger::Aggroing);
    }

    fn think(&mut self, ctx: &mut BrainContext) -> Transition<BrainState> {
        if ctx.settings.pvp_mode && !ctx.has_aggro() {
            ctx.check_proximity_aggro();
        }

        if self.disengaged(ctx) && !ctx.body.status().is_stunned_or_mezzed() {
            let next = Self::exit_target(ctx);
            debug!(
                target: "runtime::brain",
                actor = %ctx.id(),
                hostiles = ctx.hostility.len(),
                next = %next,
                "leaving aggro"
            );
            // Stale entries would pull the actor straight back in.
            ctx.clear_hostility();
            return Transition::Goto(next);
        }

        if ctx.body.is_stealthed() {
            ctx.body.set_stealth(false);
        }
        ctx.attack_most_hated();
        ctx.check_offensive_abilities();
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut BrainContext) {
        if ctx.body.is_attacking() {
            ctx.body.stop_attack();
        }
        ctx.body.clear_target();
    }
}
