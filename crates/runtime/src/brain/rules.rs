//! Transition predicates shared by the brain states.
//!
//! Priority order, first match wins:
//!
//! 1. group context: a camp point leads to Camp, a foreign leader to
//!    Follow-Leader
//! 2. too far from spawn: Return-To-Spawn
//! 3. patrol path: Patrolling
//! 4. free to roam and not engaged: Roaming
//! 5. hostile within aggro range: Aggro
//!
//! Each state picks the subset it cares about; rules leading back into the
//! current state are skipped.

use state_machine::Rules;

use super::{BrainContext, BrainState};

pub type BrainRules = Rules<BrainState, BrainContext>;

pub fn holds_camp(ctx: &mut BrainContext) -> bool {
    ctx.group().is_some_and(|group| group.camp_point.is_some())
}

pub fn follows_leader(ctx: &mut BrainContext) -> bool {
    let actor = ctx.id();
    ctx.group().is_some_and(|group| !group.is_leader(actor))
}

pub fn beyond_tether(ctx: &mut BrainContext) -> bool {
    ctx.is_beyond_tether()
}

pub fn has_patrol_path(ctx: &mut BrainContext) -> bool {
    ctx.body.has_patrol_path()
}

pub fn free_to_roam(ctx: &mut BrainContext) -> bool {
    ctx.body.can_roam() && !ctx.body.is_attacking() && !ctx.has_aggro()
}

/// Scans for hostiles; the scan registers what it finds in the table.
pub fn hostile_in_range(ctx: &mut BrainContext) -> bool {
    !ctx.settings.prevent_combat && ctx.check_proximity_aggro()
}

pub fn camp() -> BrainRules {
    Rules::new().rule("camp_point", BrainState::Camp, holds_camp)
}

pub fn group() -> BrainRules {
    camp().rule("follow_leader", BrainState::FollowLeader, follows_leader)
}

pub fn tether() -> BrainRules {
    Rules::new().rule("tether", BrainState::ReturnToSpawn, beyond_tether)
}

pub fn patrol() -> BrainRules {
    Rules::new().rule("patrol_path", BrainState::Patrolling, has_patrol_path)
}

pub fn roam() -> BrainRules {
    Rules::new().rule("free_roam", BrainState::Roaming, free_to_roam)
}

pub fn aggro() -> BrainRules {
    Rules::new().rule("proximity_aggro", BrainState::Aggro, hostile_in_range)
}

/// The full shared list, in priority order.
pub fn shared() -> BrainRules {
    group()
        .extend(&tether())
        .extend(&patrol())
        .extend(&roam())
        .extend(&aggro())
}
