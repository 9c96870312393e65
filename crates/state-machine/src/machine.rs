//! The state machine driver.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::{Change, State, Transition};

/// A finite state machine over identifiers `S` with context `C`.
///
/// # Semantics
///
/// - Exactly one state is current at any time.
/// - The initial state's `enter` runs on the first [`tick`](Self::tick)
///   (or explicitly through [`start`](Self::start)).
/// - [`tick`](Self::tick) runs the current state's `think` once and applies
///   at most one transition: the first decision wins for that tick.
/// - Transitions to the current state or to an identifier missing from the
///   table are ignored.
pub struct StateMachine<S, C> {
    states: HashMap<S, Box<dyn State<S, C>>>,
    current: S,
    started: bool,
    transitions: u64,
}

impl<S, C> StateMachine<S, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
{
    pub(crate) fn from_table(states: HashMap<S, Box<dyn State<S, C>>>, initial: S) -> Self {
        Self {
            states,
            current: initial,
            started: false,
            transitions: 0,
        }
    }

    /// Returns the identifier of the current state.
    #[inline]
    pub fn current(&self) -> S {
        self.current
    }

    /// Returns `true` once the initial state has been entered.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of transitions applied since construction.
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Returns `true` if `state` has an entry in the table.
    pub fn contains(&self, state: S) -> bool {
        self.states.contains_key(&state)
    }

    /// Enters the initial state if that has not happened yet.
    pub fn start(&mut self, ctx: &mut C) {
        if self.started {
            return;
        }
        self.started = true;
        if let Some(state) = self.states.get_mut(&self.current) {
            state.enter(ctx);
        }
    }

    /// Runs one evaluation of the current state.
    ///
    /// Returns the applied change, or `None` if the machine stayed put.
    pub fn tick(&mut self, ctx: &mut C) -> Option<Change<S>> {
        self.start(ctx);

        let decision = match self.states.get_mut(&self.current) {
            Some(state) => state.think(ctx),
            None => Transition::Stay,
        };

        match decision {
            Transition::Stay => None,
            Transition::Goto(next) => self.transition(ctx, next),
        }
    }

    /// Switches to `next` immediately, running `exit` then `enter`.
    ///
    /// This is also the entry point for external signals (for example a
    /// death notification) that must override whatever the current state
    /// would decide. Forcing a transition before the machine started skips
    /// the initial state entirely.
    pub fn transition(&mut self, ctx: &mut C, next: S) -> Option<Change<S>> {
        if !self.states.contains_key(&next) {
            return None;
        }

        if !self.started {
            self.started = true;
            let from = self.current;
            self.current = next;
            if let Some(state) = self.states.get_mut(&next) {
                state.enter(ctx);
            }
            self.transitions += 1;
            return Some(Change { from, to: next });
        }

        if next == self.current {
            return None;
        }

        if let Some(state) = self.states.get_mut(&self.current) {
            state.exit(ctx);
        }

        let from = self.current;
        self.current = next;

        if let Some(state) = self.states.get_mut(&next) {
            state.enter(ctx);
        }

        self.transitions += 1;
        Some(Change { from, to: next })
    }
}

impl<S: fmt::Debug, C> fmt::Debug for StateMachine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("started", &self.started)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}
