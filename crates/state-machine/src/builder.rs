//! Builder for state tables.
//!
//! Collects one [`State`] per identifier and checks that the initial state
//! exists before handing out a [`StateMachine`].

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::hash::Hash;

use crate::{State, StateMachine};

/// Errors reported when a state table is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError<S> {
    /// No states were registered.
    Empty,

    /// The requested initial state has no entry in the table.
    MissingInitial(S),
}

impl<S: fmt::Debug> fmt::Display for BuildError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Empty => write!(f, "state table is empty"),
            BuildError::MissingInitial(state) => {
                write!(f, "initial state {:?} is not in the table", state)
            }
        }
    }
}

impl<S: fmt::Debug> Error for BuildError<S> {}

/// Collects state behaviors keyed by identifier.
pub struct StateMachineBuilder<S, C> {
    states: HashMap<S, Box<dyn State<S, C>>>,
}

impl<S, C> StateMachineBuilder<S, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Registers the behavior for `id`, replacing any earlier registration.
    #[must_use]
    pub fn state(mut self, id: S, state: impl State<S, C> + 'static) -> Self {
        self.states.insert(id, Box::new(state));
        self
    }

    /// Registers an already boxed behavior for `id`.
    #[must_use]
    pub fn boxed(mut self, id: S, state: Box<dyn State<S, C>>) -> Self {
        self.states.insert(id, state);
        self
    }

    /// Finishes the table with `initial` as the starting state.
    pub fn build(self, initial: S) -> Result<StateMachine<S, C>, BuildError<S>> {
        if self.states.is_empty() {
            return Err(BuildError::Empty);
        }
        if !self.states.contains_key(&initial) {
            return Err(BuildError::MissingInitial(initial));
        }
        Ok(StateMachine::from_table(self.states, initial))
    }
}

impl<S, C> Default for StateMachineBuilder<S, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
