//! Value types describing actors as the core sees them.
//!
//! Actors themselves are owned by the embedding world; the core only reads
//! identifiers, positions and status bits, and keeps its own per-actor
//! bookkeeping such as the [`HostilityTable`].
mod common;
mod group;
mod hostility;
mod status;

pub use common::{ActorId, Position, ResourceLevels, Tick};
pub use group::GroupView;
pub use hostility::HostilityTable;
pub use status::StatusFlags;
