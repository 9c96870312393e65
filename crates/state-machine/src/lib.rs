//! Table-driven finite state machine for tick-based simulations.
//!
//! Each machine owns a table mapping a state identifier to the behavior that
//! runs on entry, once per tick, and on exit. Transitions are synchronous:
//! the outgoing state's `exit` and the incoming state's `enter` run inside
//! the same call, and a machine applies at most one transition per tick.
//!
//! - **Deterministic**: no clocks, no threads, no hidden scheduling
//! - **Per-instance state**: every machine owns its state objects, so local
//!   counters (timers, cooldowns) live next to the behavior that uses them
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`State`]: enter / think / exit hooks for one state identifier
//! - [`Transition`]: what a `think` call decided
//! - [`Rules`]: ordered transition predicates, first match wins
//! - [`StateMachine`]: current identifier plus the state table
//! - [`StateMachineBuilder`]: validates the table before use

pub mod builder;
pub mod machine;
pub mod rules;
pub mod state;
pub mod transition;

// Re-export core types for ergonomic API
pub use builder::{BuildError, StateMachineBuilder};
pub use machine::StateMachine;
pub use rules::{Predicate, Rule, Rules};
pub use state::State;
pub use transition::{Change, Transition};
