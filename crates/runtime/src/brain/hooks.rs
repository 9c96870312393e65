//! Content hooks evaluated before the state machine thinks.
//!
//! Named creatures layer their own behavior on top of the shared state
//! table through hooks instead of replacing states.

use std::sync::Arc;

use tracing::debug;

use sim_core::{Spell, SpellLine};

use super::{BrainContext, BrainState, SpellChoice};

/// Runs once per tick before the current state's `think`.
///
/// Returning a state other than the current one forces that transition and
/// consumes the tick.
pub trait BrainHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn before_think(&self, ctx: &mut BrainContext, state: BrainState) -> Option<BrainState>;
}

/// Walks home as soon as nothing is left to fight.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResetOnDisengage;

impl BrainHook for ResetOnDisengage {
    fn name(&self) -> &'static str {
        "reset_on_disengage"
    }

    fn before_think(&self, ctx: &mut BrainContext, state: BrainState) -> Option<BrainState> {
        (state == BrainState::Aggro && !ctx.has_aggro()).then_some(BrainState::ReturnToSpawn)
    }
}

/// Occasionally casts a fixed spell at the most hated actor while engaged.
#[derive(Clone, Debug)]
pub struct OpportunisticCast {
    spell: Arc<Spell>,
    line: SpellLine,
    chance: u8,
}

impl OpportunisticCast {
    pub fn new(spell: Arc<Spell>, line: SpellLine, chance: u8) -> Self {
        Self {
            spell,
            line,
            chance,
        }
    }
}

impl BrainHook for OpportunisticCast {
    fn name(&self) -> &'static str {
        "opportunistic_cast"
    }

    fn before_think(&self, ctx: &mut BrainContext, _state: BrainState) -> Option<BrainState> {
        let target = ctx.hostility.most_hated()?;
        if ctx.casting.is_casting() || !ctx.roll_chance(self.chance) {
            return None;
        }
        debug!(
            target: "runtime::brain",
            actor = %ctx.id(),
            %target,
            spell = %self.spell.id,
            "opportunistic cast"
        );
        let choice = SpellChoice::new(Arc::clone(&self.spell), self.line.clone()).at(target);
        ctx.casting.request_cast(choice.into_request());
        None
    }
}
