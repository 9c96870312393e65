//! Standing effects left behind by completed casts.

mod list;
mod pipeline;

pub use list::{EffectInstance, EffectList};
pub use pipeline::{EffectOp, EffectPipeline};
