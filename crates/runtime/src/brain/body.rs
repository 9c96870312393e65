//! The autonomous actor a brain controls.

use std::sync::Arc;

use sim_core::{AbilityId, Actor, ActorId, CastRequest, GroupView, Position, Spell, SpellLine, Tick};

/// Ambient lines an actor can speak when something happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AmbientTrigger {
    Roaming,
    Aggroing,
    Dying,
}

/// A spell picked by the body's own spell selection.
#[derive(Clone, Debug)]
pub struct SpellChoice {
    pub spell: Arc<Spell>,
    pub line: SpellLine,
    pub target: Option<ActorId>,
}

impl SpellChoice {
    pub fn new(spell: Arc<Spell>, line: SpellLine) -> Self {
        Self {
            spell,
            line,
            target: None,
        }
    }

    #[must_use]
    pub fn at(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn into_request(self) -> CastRequest {
        CastRequest {
            spell: self.spell,
            line: self.line,
            ability: None,
            target: self.target,
        }
    }
}

/// World-facing operations a brain issues to its body.
///
/// Movement, combat and spell selection belong to the embedding world; the
/// brain only decides *when* to use them.
pub trait Body: Actor {
    // ===== group =====
    fn group(&self) -> Option<GroupView>;

    // ===== spawn & tether =====
    fn spawn_point(&self) -> Position;
    fn set_spawn_point(&self, point: Position);
    fn spawn_heading(&self) -> u16;
    fn turn_to(&self, heading: u16);
    /// Maximum distance from spawn before the actor walks home; `None`
    /// disables tethering.
    fn tether_range(&self) -> Option<u32>;
    fn has_patrol_path(&self) -> bool;
    fn can_roam(&self) -> bool;
    fn in_dungeon(&self) -> bool;

    // ===== combat =====
    fn is_attacking(&self) -> bool;
    fn in_combat(&self) -> bool;
    fn last_combat_at(&self) -> Option<Tick>;
    fn is_engaging(&self) -> bool;
    /// Hostile actors within `range` of the body.
    fn hostiles_within(&self, range: u32) -> Vec<ActorId>;
    fn attack(&self, target: ActorId);
    fn stop_attack(&self);
    fn clear_target(&self);

    // ===== movement =====
    fn is_moving(&self) -> bool;
    fn current_speed(&self) -> u32;
    fn max_speed(&self) -> u32;
    fn follow(&self, leader: ActorId);
    fn stop_following(&self);
    fn follow_target(&self) -> Option<ActorId>;
    fn return_to_spawn(&self, speed: u32);
    fn is_returning_to_spawn(&self) -> bool;
    fn move_on_path(&self, speed: u32);
    fn roam(&self, speed: u32, range: u32);
    fn stop_moving(&self);

    // ===== posture =====
    fn is_sitting(&self) -> bool;
    fn sit(&self, sitting: bool);
    fn is_stealthed(&self) -> bool;
    /// Whether the actor was stealthed before its last fight.
    fn was_stealthed(&self) -> bool;
    fn set_stealth(&self, stealthed: bool);
    fn fire_ambient(&self, trigger: AmbientTrigger);

    // ===== spell selection =====
    fn defensive_spell(&self) -> Option<SpellChoice>;
    fn offensive_spell(&self, target: ActorId) -> Option<SpellChoice>;
    fn defensive_abilities(&self) -> Vec<AbilityId>;
    fn offensive_abilities(&self) -> Vec<AbilityId>;

    /// Returns true if the body fought within `window_ms` before `now`.
    fn in_combat_within(&self, now: Tick, window_ms: u64) -> bool {
        self.in_combat()
            || self
                .last_combat_at()
                .is_some_and(|last| now.since(last) < window_ms)
    }

    /// Returns true if the body is close enough to its spawn point.
    fn is_near_spawn(&self, radius: u32) -> bool {
        self.position().within(&self.spawn_point(), radius)
    }
}
