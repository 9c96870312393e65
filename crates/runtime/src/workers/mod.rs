//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns all per-actor state and is the only task that
//! ticks schedulers and brains.

mod simulation;

pub use simulation::{ActorSnapshot, Command, SimulationWorker};
