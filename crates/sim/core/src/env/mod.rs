//! Traits describing the collaborators the core talks to.
//!
//! The embedding world supplies actors, an action provider and an observer
//! feedback sink; the core never constructs or destroys any of them.
mod actor;
mod feedback;
mod provider;
mod rng;

pub use actor::{Actor, ActorEvent, CastFailedReason};
pub use feedback::{Audience, Feedback, FeedbackSink, NullFeedback};
pub use provider::{ActionProvider, StandardActionProvider};
pub use rng::{PcgRng, RngOracle, compute_seed};
