//! Casting and ability scheduling.
//!
//! Each actor gets a [`CastingScheduler`] fed by a multi-producer inbound
//! queue. Producers hold a [`CastingHandle`]; the simulation loop drives all
//! schedulers through the [`CastingService`], which only visits actors that
//! are present in the [`TickRegistry`].

mod handle;
mod registry;
mod scheduler;
mod service;

pub use handle::{CastState, CastingDirectory, CastingHandle};
pub use registry::TickRegistry;
pub use scheduler::{CastingScheduler, TickReport};
pub use service::CastingService;
