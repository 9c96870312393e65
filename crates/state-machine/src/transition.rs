//! Transition decisions and applied changes.

/// The decision returned by a state's `think` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition<S> {
    /// Remain in the current state.
    Stay,

    /// Leave the current state for the given one.
    Goto(S),
}

impl<S> Transition<S> {
    /// Returns `true` if this decision keeps the current state.
    #[inline]
    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }

    /// Returns the requested target, if any.
    #[inline]
    pub fn target(self) -> Option<S> {
        match self {
            Transition::Stay => None,
            Transition::Goto(target) => Some(target),
        }
    }
}

impl<S> From<Option<S>> for Transition<S> {
    fn from(target: Option<S>) -> Self {
        match target {
            Some(target) => Transition::Goto(target),
            None => Transition::Stay,
        }
    }
}

/// A transition that was actually applied by a [`crate::StateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Change<S> {
    pub from: S,
    pub to: S,
}
