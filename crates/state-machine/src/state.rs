//! Core state trait.
//!
//! This module defines the [`State`] trait, the unit stored in a machine's
//! state table. The trait is generic over the identifier type `S` and a
//! context type `C`, allowing states to read and mutate whatever the owner
//! passes in on each tick.

use crate::Transition;

/// Behavior attached to one state identifier.
///
/// `enter` runs once when the machine switches into the state, `think` runs
/// once per tick while the state is current, and `exit` runs once when the
/// machine switches away. States take `&mut self` so they can keep local
/// counters between ticks.
pub trait State<S, C>: Send {
    /// Called once on transition into this state.
    fn enter(&mut self, _ctx: &mut C) {}

    /// Evaluate this state for one tick.
    ///
    /// # Returns
    ///
    /// - `Transition::Stay` to remain in this state
    /// - `Transition::Goto(next)` to switch to `next` before the tick ends
    fn think(&mut self, ctx: &mut C) -> Transition<S>;

    /// Called once on transition out of this state.
    fn exit(&mut self, _ctx: &mut C) {}
}

/// Blanket implementation for boxed states.
impl<S, C> State<S, C> for Box<dyn State<S, C>> {
    #[inline]
    fn enter(&mut self, ctx: &mut C) {
        (**self).enter(ctx)
    }

    #[inline]
    fn think(&mut self, ctx: &mut C) -> Transition<S> {
        (**self).think(ctx)
    }

    #[inline]
    fn exit(&mut self, ctx: &mut C) {
        (**self).exit(ctx)
    }
}
