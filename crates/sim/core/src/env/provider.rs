use crate::action::{BuildError, CastRequest, RunnableAction, TimedCast};

use super::Actor;

/// Builds runnable actions from cast requests.
///
/// Construction is the only point where a target is bound: the request's
/// target if present, otherwise the owner's current target at that moment.
pub trait ActionProvider: Send + Sync {
    fn build(
        &self,
        owner: &dyn Actor,
        request: &CastRequest,
    ) -> Result<Box<dyn RunnableAction>, BuildError>;
}

/// Provider producing [`TimedCast`] actions.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardActionProvider;

impl ActionProvider for StandardActionProvider {
    fn build(
        &self,
        owner: &dyn Actor,
        request: &CastRequest,
    ) -> Result<Box<dyn RunnableAction>, BuildError> {
        let target = request.target.or_else(|| owner.current_target());
        if request.spell.requires_target && target.is_none() {
            return Err(BuildError::NoTarget(request.spell.id));
        }
        Ok(Box::new(TimedCast::new(
            request.spell.clone(),
            request.line.clone(),
            target,
            request.ability,
        )))
    }
}
