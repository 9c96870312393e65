use std::sync::Arc;

use crate::state::ActorId;

use super::{AbilityId, Spell, SpellLine};

/// Request to cast a spell.
#[derive(Clone, Debug)]
pub struct CastRequest {
    pub spell: Arc<Spell>,
    pub line: SpellLine,
    /// Ability that triggered the cast; it is told when the cast completes.
    pub ability: Option<AbilityId>,
    /// Target resolved by the producer. When absent the action binds the
    /// owner's current target at construction.
    pub target: Option<ActorId>,
}

impl CastRequest {
    pub fn new(spell: Arc<Spell>, line: SpellLine) -> Self {
        Self {
            spell,
            line,
            ability: None,
            target: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }
}

/// Request to use an ability. Validity is decided when it executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityRequest {
    pub ability: AbilityId,
}

/// Everything a producer can ask an actor's casting scheduler to do.
///
/// Requests are immutable once created and consumed at most once.
#[derive(Clone, Debug)]
pub enum ActionRequest {
    CastSpell(CastRequest),
    UseAbility(AbilityRequest),
}

impl ActionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionRequest::CastSpell(_) => "cast_spell",
            ActionRequest::UseAbility(_) => "use_ability",
        }
    }
}

impl From<CastRequest> for ActionRequest {
    fn from(request: CastRequest) -> Self {
        ActionRequest::CastSpell(request)
    }
}

impl From<AbilityRequest> for ActionRequest {
    fn from(request: AbilityRequest) -> Self {
        ActionRequest::UseAbility(request)
    }
}
