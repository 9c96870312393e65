//! Behaviors registered in every brain's state table.

mod aggro;
mod camp;
mod dead;
mod follow_leader;
mod idle;
mod patrolling;
mod return_to_spawn;
mod roaming;
mod waking_up;

use state_machine::{BuildError, StateMachine, StateMachineBuilder};

use super::{BrainContext, BrainState};

pub use aggro::Aggro;
pub use camp::Camp;
pub use dead::Dead;
pub use follow_leader::FollowLeader;
pub use idle::Idle;
pub use patrolling::Patrolling;
pub use return_to_spawn::ReturnToSpawn;
pub use roaming::Roaming;
pub use waking_up::WakingUp;

pub type BrainMachine = StateMachine<BrainState, BrainContext>;

/// Builds the standard table, starting in [`BrainState::WakingUp`].
pub fn standard_table() -> Result<BrainMachine, BuildError<BrainState>> {
    StateMachineBuilder::new()
        .state(BrainState::WakingUp, WakingUp::new())
        .state(BrainState::Idle, Idle::new())
        .state(BrainState::FollowLeader, FollowLeader::new())
        .state(BrainState::Aggro, Aggro::new())
        .state(BrainState::Roaming, Roaming::new())
        .state(BrainState::Camp, Camp::new())
        .state(BrainState::ReturnToSpawn, ReturnToSpawn::new())
        .state(BrainState::Patrolling, Patrolling::new())
        .state(BrainState::Dead, Dead)
        .build(BrainState::WakingUp)
}
