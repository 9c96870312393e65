use std::fmt;
use std::sync::Arc;

use crate::state::{ActorId, Tick};

use super::{AbilityId, ExclusivityClass, Spell, SpellLine};

/// Lifecycle phase reported by a runnable action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionPhase {
    /// Still counting down its cast time.
    Casting,
    /// Finished; its effects may be resolved.
    Complete,
    /// Aborted before completion.
    Interrupted,
}

/// A spell in flight.
///
/// Built from a cast request by an action provider. The target is frozen at
/// construction; later target changes on the owner do not affect it.
pub trait RunnableAction: Send + fmt::Debug {
    fn spell(&self) -> &Arc<Spell>;

    fn line(&self) -> &SpellLine;

    fn target(&self) -> Option<ActorId>;

    fn ability(&self) -> Option<AbilityId>;

    /// Game time at which [`begin`](Self::begin) ran, if it has.
    fn started_at(&self) -> Option<Tick>;

    fn phase(&self) -> ActionPhase;

    /// Starts the action at `now`. This is its first tick.
    fn begin(&mut self, now: Tick);

    /// Advances the action to `now` and reports its phase.
    fn tick(&mut self, now: Tick) -> ActionPhase;

    /// Aborts the action. Completed actions stay completed.
    fn interrupt(&mut self);

    #[inline]
    fn cast_time_ms(&self) -> u64 {
        self.spell().cast_time_ms
    }

    #[inline]
    fn is_instant(&self) -> bool {
        self.spell().is_instant()
    }

    #[inline]
    fn is_focus(&self) -> bool {
        self.spell().focus
    }

    #[inline]
    fn is_interruptible(&self) -> bool {
        self.spell().interruptible
    }

    #[inline]
    fn exclusivity(&self) -> Option<ExclusivityClass> {
        self.spell().exclusivity
    }

    #[inline]
    fn is_exempt_from_exclusivity(&self) -> bool {
        self.spell().exempt_from_exclusivity
    }

    /// Returns true while the action has started and not yet finished.
    fn is_casting(&self) -> bool {
        self.started_at().is_some() && self.phase() == ActionPhase::Casting
    }

    /// Cast time still to run at `now`, in milliseconds.
    fn remaining_ms(&self, now: Tick) -> u64 {
        match self.started_at() {
            Some(start) => (start + self.cast_time_ms()).since(now),
            None => self.cast_time_ms(),
        }
    }
}

/// What a finished action leaves behind for downstream consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub owner: ActorId,
    pub spell: Arc<Spell>,
    pub line: SpellLine,
    pub target: Option<ActorId>,
    pub ability: Option<AbilityId>,
    pub started_at: Tick,
    pub completed_at: Tick,
}

impl ActionOutcome {
    pub fn from_action(owner: ActorId, action: &dyn RunnableAction, now: Tick) -> Self {
        Self {
            owner,
            spell: Arc::clone(action.spell()),
            line: action.line().clone(),
            target: action.target(),
            ability: action.ability(),
            started_at: action.started_at().unwrap_or(now),
            completed_at: now,
        }
    }

    #[inline]
    pub fn was_instant(&self) -> bool {
        self.spell.is_instant()
    }
}

/// Runnable action that completes once its cast time has elapsed.
#[derive(Debug)]
pub struct TimedCast {
    spell: Arc<Spell>,
    line: SpellLine,
    target: Option<ActorId>,
    ability: Option<AbilityId>,
    started_at: Option<Tick>,
    phase: ActionPhase,
}

impl TimedCast {
    pub fn new(
        spell: Arc<Spell>,
        line: SpellLine,
        target: Option<ActorId>,
        ability: Option<AbilityId>,
    ) -> Self {
        Self {
            spell,
            line,
            target,
            ability,
            started_at: None,
            phase: ActionPhase::Casting,
        }
    }
}

impl RunnableAction for TimedCast {
    fn spell(&self) -> &Arc<Spell> {
        &self.spell
    }

    fn line(&self) -> &SpellLine {
        &self.line
    }

    fn target(&self) -> Option<ActorId> {
        self.target
    }

    fn ability(&self) -> Option<AbilityId> {
        self.ability
    }

    fn started_at(&self) -> Option<Tick> {
        self.started_at
    }

    fn phase(&self) -> ActionPhase {
        self.phase
    }

    fn begin(&mut self, now: Tick) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    fn tick(&mut self, now: Tick) -> ActionPhase {
        if self.phase != ActionPhase::Casting {
            return self.phase;
        }
        let start = *self.started_at.get_or_insert(now);
        if now.since(start) >= self.spell.cast_time_ms {
            self.phase = ActionPhase::Complete;
        }
        self.phase
    }

    fn interrupt(&mut self) {
        if self.phase == ActionPhase::Casting {
            self.phase = ActionPhase::Interrupted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SpellId;

    fn cast(cast_time_ms: u64) -> TimedCast {
        TimedCast::new(
            Arc::new(Spell::new(SpellId(1), "test", cast_time_ms)),
            SpellLine::new("line"),
            Some(ActorId(2)),
            None,
        )
    }

    #[test]
    fn test_instant_completes_on_first_tick() {
        let mut action = cast(0);
        action.begin(Tick(100));
        assert_eq!(action.tick(Tick(100)), ActionPhase::Complete);
    }

    #[test]
    fn test_timed_cast_completes_after_cast_time() {
        let mut action = cast(2000);
        action.begin(Tick(1000));
        assert!(action.is_casting());
        assert_eq!(action.tick(Tick(2500)), ActionPhase::Casting);
        assert_eq!(action.remaining_ms(Tick(2500)), 500);
        assert_eq!(action.tick(Tick(3000)), ActionPhase::Complete);
        assert!(!action.is_casting());
    }

    #[test]
    fn test_interrupt_does_not_undo_completion() {
        let mut action = cast(0);
        action.tick(Tick(5));
        action.interrupt();
        assert_eq!(action.phase(), ActionPhase::Complete);

        let mut action = cast(100);
        action.begin(Tick(0));
        action.interrupt();
        assert_eq!(action.tick(Tick(200)), ActionPhase::Interrupted);
    }
}
