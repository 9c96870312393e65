use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::trace;

use sim_core::{
    AbilityError, AbilityId, ActionOutcome, Actor, ActorEvent, ActorId, GroupView, Position,
    ResourceLevels, StatusFlags, Tick,
};

use crate::brain::{AmbientTrigger, Body, SpellChoice};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Presence {
    position: Position,
    faction: u8,
    alive: bool,
}

/// Positions and factions of every scripted actor, plus the game clock.
///
/// Movement is instant: a move order teleports the actor and it is
/// stationary again on the next read.
#[derive(Debug, Default)]
pub struct SceneWorld {
    clock: AtomicU64,
    actors: RwLock<BTreeMap<ActorId, Presence>>,
}

impl SceneWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        Tick(self.clock.load(Ordering::Acquire))
    }

    pub fn set_now(&self, now: Tick) {
        self.clock.store(now.0, Ordering::Release);
    }

    pub fn place(&self, actor: ActorId, position: Position, faction: u8) {
        self.write().insert(
            actor,
            Presence {
                position,
                faction,
                alive: true,
            },
        );
    }

    pub fn position(&self, actor: ActorId) -> Option<Position> {
        self.read().get(&actor).map(|presence| presence.position)
    }

    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.read().get(&actor).is_some_and(|presence| presence.alive)
    }

    pub fn set_alive(&self, actor: ActorId, alive: bool) {
        if let Some(presence) = self.write().get_mut(&actor) {
            presence.alive = alive;
        }
    }

    fn move_to(&self, actor: ActorId, position: Position) {
        if let Some(presence) = self.write().get_mut(&actor) {
            presence.position = position;
        }
    }

    /// Living actors of another faction within `range` of `actor`.
    pub fn hostiles_within(&self, actor: ActorId, range: u32) -> Vec<ActorId> {
        let actors = self.read();
        let Some(me) = actors.get(&actor) else {
            return Vec::new();
        };
        actors
            .iter()
            .filter(|(id, other)| {
                **id != actor
                    && other.alive
                    && other.faction != me.faction
                    && other.position.within(&me.position, range)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<ActorId, Presence>> {
        self.actors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<ActorId, Presence>> {
        self.actors.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Static part of a scripted actor.
#[derive(Clone, Debug)]
pub(crate) struct SceneProfile {
    pub follow_up: bool,
    pub enforce_exclusivity: bool,
    pub can_roam: bool,
    pub patrol: bool,
    pub in_dungeon: bool,
    pub tether: Option<u32>,
    pub max_speed: u32,
    pub defensive_spell: Option<SpellChoice>,
    pub offensive_spell: Option<SpellChoice>,
    pub abilities: Vec<AbilityId>,
}

#[derive(Debug)]
struct SceneState {
    status: StatusFlags,
    resources: ResourceLevels,
    target: Option<ActorId>,
    group: Option<GroupView>,
    spawn: Position,
    spawn_heading: u16,
    heading: u16,
    attacking: Option<ActorId>,
    last_combat_at: Option<Tick>,
    following: Option<ActorId>,
    sitting: bool,
    stealthed: bool,
    was_stealthed: bool,
    roams: u32,
    events: Vec<ActorEvent>,
    ambient: Vec<AmbientTrigger>,
}

/// Actor used by scenarios and tests.
///
/// Implements both the casting capability interface and the brain body on
/// top of a [`SceneWorld`].
#[derive(Debug)]
pub struct SceneActor {
    id: ActorId,
    name: String,
    world: Arc<SceneWorld>,
    profile: SceneProfile,
    state: Mutex<SceneState>,
}

impl SceneActor {
    pub(crate) fn new(
        id: ActorId,
        name: String,
        world: Arc<SceneWorld>,
        profile: SceneProfile,
        heading: u16,
        resources: ResourceLevels,
        stealthed: bool,
    ) -> Self {
        let spawn = world.position(id).unwrap_or_default();
        Self {
            id,
            name,
            world,
            profile,
            state: Mutex::new(SceneState {
                status: StatusFlags::empty(),
                resources,
                target: None,
                group: None,
                spawn,
                spawn_heading: heading,
                heading,
                attacking: None,
                last_combat_at: None,
                following: None,
                sitting: false,
                stealthed,
                was_stealthed: stealthed,
                roams: 0,
                events: Vec::new(),
                ambient: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SceneState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_status(&self, status: StatusFlags) {
        self.lock().status = status;
    }

    pub fn set_target(&self, target: Option<ActorId>) {
        self.lock().target = target;
    }

    pub fn set_group(&self, group: Option<GroupView>) {
        self.lock().group = group;
    }

    pub fn set_resources(&self, resources: ResourceLevels) {
        self.lock().resources = resources;
    }

    pub fn move_to(&self, position: Position) {
        self.world.move_to(self.id, position);
    }

    pub fn heading(&self) -> u16 {
        self.lock().heading
    }

    pub fn roams(&self) -> u32 {
        self.lock().roams
    }

    pub fn following(&self) -> Option<ActorId> {
        self.lock().following
    }

    /// Notifications received so far.
    pub fn events(&self) -> Vec<ActorEvent> {
        self.lock().events.clone()
    }

    pub fn ambient(&self) -> Vec<AmbientTrigger> {
        self.lock().ambient.clone()
    }
}

impl Actor for SceneActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn status(&self) -> StatusFlags {
        self.lock().status
    }

    fn position(&self) -> Position {
        self.world.position(self.id).unwrap_or_default()
    }

    fn current_target(&self) -> Option<ActorId> {
        self.lock().target
    }

    fn resources(&self) -> ResourceLevels {
        self.lock().resources
    }

    fn supports_follow_up_casting(&self) -> bool {
        self.profile.follow_up
    }

    fn enforces_cast_exclusivity(&self) -> bool {
        self.profile.enforce_exclusivity
    }

    fn notify(&self, event: ActorEvent) {
        trace!(target: "runtime::scenario", actor = %self.id, ?event, "notify");
        self.lock().events.push(event);
    }

    fn on_cast_complete(&self, outcome: &ActionOutcome) {
        if let Some(target) = outcome.target
            && target != self.id
        {
            self.lock().last_combat_at = Some(outcome.completed_at);
        }
    }

    fn execute_ability(&self, ability: AbilityId) -> Result<(), AbilityError> {
        if self.profile.abilities.contains(&ability) {
            Ok(())
        } else {
            Err(AbilityError::Unavailable(ability))
        }
    }
}

impl Body for SceneActor {
    fn group(&self) -> Option<GroupView> {
        self.lock().group.clone()
    }

    fn spawn_point(&self) -> Position {
        self.lock().spawn
    }

    fn set_spawn_point(&self, point: Position) {
        self.lock().spawn = point;
    }

    fn spawn_heading(&self) -> u16 {
        self.lock().spawn_heading
    }

    fn turn_to(&self, heading: u16) {
        self.lock().heading = heading;
    }

    fn tether_range(&self) -> Option<u32> {
        self.profile.tether
    }

    fn has_patrol_path(&self) -> bool {
        self.profile.patrol
    }

    fn can_roam(&self) -> bool {
        self.profile.can_roam
    }

    fn in_dungeon(&self) -> bool {
        self.profile.in_dungeon
    }

    /// Attacking a dead target does not count.
    fn is_attacking(&self) -> bool {
        let attacking = self.lock().attacking;
        attacking.is_some_and(|target| self.world.is_alive(target))
    }

    fn in_combat(&self) -> bool {
        self.is_attacking()
    }

    fn last_combat_at(&self) -> Option<Tick> {
        self.lock().last_combat_at
    }

    fn is_engaging(&self) -> bool {
        self.is_attacking()
    }

    fn hostiles_within(&self, range: u32) -> Vec<ActorId> {
        self.world.hostiles_within(self.id, range)
    }

    fn attack(&self, target: ActorId) {
        let now = self.world.now();
        let mut state = self.lock();
        state.attacking = Some(target);
        state.target = Some(target);
        state.last_combat_at = Some(now);
    }

    fn stop_attack(&self) {
        self.lock().attacking = None;
    }

    fn clear_target(&self) {
        self.lock().target = None;
    }

    fn is_moving(&self) -> bool {
        false
    }

    fn current_speed(&self) -> u32 {
        0
    }

    fn max_speed(&self) -> u32 {
        self.profile.max_speed
    }

    fn follow(&self, leader: ActorId) {
        self.lock().following = Some(leader);
        if let Some(position) = self.world.position(leader) {
            self.world.move_to(self.id, position.offset(-50, 0));
        }
    }

    fn stop_following(&self) {
        self.lock().following = None;
    }

    fn follow_target(&self) -> Option<ActorId> {
        self.lock().following
    }

    fn return_to_spawn(&self, _speed: u32) {
        let spawn = self.lock().spawn;
        self.world.move_to(self.id, spawn);
    }

    fn is_returning_to_spawn(&self) -> bool {
        false
    }

    fn move_on_path(&self, _speed: u32) {}

    /// Walks to a point on a small circle around the spawn point.
    fn roam(&self, _speed: u32, range: u32) {
        let (spawn, step) = {
            let mut state = self.lock();
            state.roams += 1;
            (state.spawn, state.roams)
        };
        let reach = i32::try_from(range.min(200)).unwrap_or(200);
        let (dx, dy) = match step % 4 {
            0 => (reach, 0),
            1 => (0, reach),
            2 => (-reach, 0),
            _ => (0, -reach),
        };
        self.world.move_to(self.id, spawn.offset(dx, dy));
    }

    fn stop_moving(&self) {}

    fn is_sitting(&self) -> bool {
        self.lock().sitting
    }

    fn sit(&self, sitting: bool) {
        self.lock().sitting = sitting;
    }

    fn is_stealthed(&self) -> bool {
        self.lock().stealthed
    }

    fn was_stealthed(&self) -> bool {
        self.lock().was_stealthed
    }

    fn set_stealth(&self, stealthed: bool) {
        self.lock().stealthed = stealthed;
    }

    fn fire_ambient(&self, trigger: AmbientTrigger) {
        self.lock().ambient.push(trigger);
    }

    fn defensive_spell(&self) -> Option<SpellChoice> {
        if !self.lock().resources.any_below(100) {
            return None;
        }
        self.profile.defensive_spell.clone().map(|choice| choice.at(self.id))
    }

    fn offensive_spell(&self, target: ActorId) -> Option<SpellChoice> {
        self.profile
            .offensive_spell
            .clone()
            .map(|choice| choice.at(target))
    }

    fn defensive_abilities(&self) -> Vec<AbilityId> {
        Vec::new()
    }

    fn offensive_abilities(&self) -> Vec<AbilityId> {
        Vec::new()
    }
}
