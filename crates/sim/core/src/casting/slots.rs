//! The two casting slots and their transition functions.
//!
//! [`CastSlots`] holds at most one *active* action and at most one *queued*
//! follow-up. Every mutation goes through one of the functions below so the
//! slot invariants hold at any observed instant:
//!
//! - instant actions never occupy a slot;
//! - `queued` is only ever filled while `active` is occupied;
//! - a newer follow-up replaces the older one wholesale.

use crate::action::{ActionPhase, CastError, RunnableAction};
use crate::config::FocusPolicy;
use crate::state::Tick;

/// Owner capabilities read once per admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub follow_up: bool,
    pub enforce_exclusivity: bool,
    pub focus: FocusPolicy,
}

/// Result of offering an action to the slots.
#[derive(Debug)]
pub enum Admission {
    /// Installed as the active action and started.
    Activated,
    /// Ran to completion immediately without touching the slots. The action
    /// is handed back so the caller can resolve its outcome.
    Instant(Box<dyn RunnableAction>),
    /// Replaced an active focus action, which is handed back.
    Preempted(Box<dyn RunnableAction>),
    /// Kept as the follow-up, replacing the previous one if any.
    Queued {
        replaced: Option<Box<dyn RunnableAction>>,
    },
    /// Refused; the slots are unchanged.
    Rejected(CastError),
}

/// Result of advancing the active action by one tick.
#[derive(Debug)]
pub enum Advance {
    /// No active action.
    Idle,
    /// The active action is still casting.
    Casting,
    /// The active action finished and left the slot.
    Completed(Box<dyn RunnableAction>),
    /// The active action aborted; both slots were cleared.
    Interrupted(Box<dyn RunnableAction>),
}

/// Active and queued slots of one actor.
#[derive(Debug, Default)]
pub struct CastSlots {
    active: Option<Box<dyn RunnableAction>>,
    queued: Option<Box<dyn RunnableAction>>,
}

impl CastSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&dyn RunnableAction> {
        self.active.as_deref()
    }

    pub fn queued(&self) -> Option<&dyn RunnableAction> {
        self.queued.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.queued.is_none()
    }

    /// Runs the admission rules for one freshly built action.
    pub fn admit(
        &mut self,
        mut action: Box<dyn RunnableAction>,
        policy: &AdmissionPolicy,
        now: Tick,
    ) -> Admission {
        if action.is_instant() {
            action.begin(now);
            action.tick(now);
            return Admission::Instant(action);
        }

        let Some(active) = self.active.as_deref() else {
            action.begin(now);
            self.active = Some(action);
            return Admission::Activated;
        };

        if active.is_focus() && policy.focus == FocusPolicy::Preempt {
            action.begin(now);
            return match self.active.replace(action) {
                Some(previous) => Admission::Preempted(previous),
                None => Admission::Activated,
            };
        }

        if let Some(rejection) = Self::exclusivity_conflict(active, action.as_ref(), policy, now) {
            return Admission::Rejected(rejection);
        }

        if policy.follow_up {
            let replaced = self.queued.replace(action);
            return Admission::Queued { replaced };
        }

        Admission::Rejected(CastError::AlreadyCasting)
    }

    fn exclusivity_conflict(
        active: &dyn RunnableAction,
        incoming: &dyn RunnableAction,
        policy: &AdmissionPolicy,
        now: Tick,
    ) -> Option<CastError> {
        if !policy.enforce_exclusivity
            || active.is_exempt_from_exclusivity()
            || incoming.is_exempt_from_exclusivity()
        {
            return None;
        }
        let class = active.exclusivity()?;
        if incoming.exclusivity() == Some(class) {
            Some(CastError::AlreadyPerforming)
        } else {
            Some(CastError::MustWait {
                remaining_ms: active.remaining_ms(now),
            })
        }
    }

    /// Advances the active action by one tick.
    ///
    /// A completed action leaves `active` empty; call [`finish`](Self::finish)
    /// to promote the follow-up. An interrupted action clears both slots.
    pub fn advance(&mut self, now: Tick) -> Advance {
        let Some(active) = self.active.as_mut() else {
            return Advance::Idle;
        };

        match active.tick(now) {
            ActionPhase::Casting => Advance::Casting,
            ActionPhase::Complete => match self.active.take() {
                Some(done) => Advance::Completed(done),
                None => Advance::Idle,
            },
            ActionPhase::Interrupted => {
                self.queued = None;
                match self.active.take() {
                    Some(aborted) => Advance::Interrupted(aborted),
                    None => Advance::Idle,
                }
            }
        }
    }

    /// Settles the slots after the active action completed.
    ///
    /// With follow-up casting the queued action becomes active and starts at
    /// `now`; otherwise both slots are emptied. Returns true if a follow-up
    /// was promoted.
    pub fn finish(&mut self, follow_up: bool, now: Tick) -> bool {
        self.active = None;
        if !follow_up {
            self.queued = None;
            return false;
        }
        match self.queued.take() {
            Some(mut next) => {
                next.begin(now);
                self.active = Some(next);
                true
            }
            None => false,
        }
    }

    /// Drops both slots and returns the active action, if any.
    pub fn clear(&mut self) -> Option<Box<dyn RunnableAction>> {
        self.queued = None;
        self.active.take()
    }
}
