//! Test doubles shared by the runtime integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use runtime::{AmbientTrigger, Body, Brain, BrainContext, BrainHook, CastingService, SpellChoice};
use sim_core::{
    AbilityError, AbilityId, Actor, ActorEvent, ActorId, Audience, BrainTuning, CastFailedReason,
    Feedback, FeedbackSink, FocusPolicy, GroupView, PcgRng, Position, ResourceLevels, Spell,
    SpellId, SpellLine, StandardActionProvider, StatusFlags, Tick,
};

/// Feedback sink that remembers everything it was sent.
#[derive(Default)]
pub struct RecordingFeedback {
    log: Mutex<Vec<(ActorId, Audience, Feedback)>>,
}

impl RecordingFeedback {
    pub fn entries(&self) -> Vec<(ActorId, Audience, Feedback)> {
        self.log.lock().unwrap().clone()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.entries().iter().map(|(_, _, f)| f.code()).collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl FeedbackSink for RecordingFeedback {
    fn send(&self, actor: ActorId, audience: Audience, feedback: Feedback) {
        self.log.lock().unwrap().push((actor, audience, feedback));
    }
}

#[derive(Debug)]
struct TestState {
    status: StatusFlags,
    position: Position,
    spawn: Position,
    heading: u16,
    target: Option<ActorId>,
    resources: ResourceLevels,
    group: Option<GroupView>,
    hostiles: Vec<(ActorId, Position)>,
    attacking: Option<ActorId>,
    /// Overrides the attack-derived combat flag when set.
    in_combat: Option<bool>,
    last_combat_at: Option<Tick>,
    following: Option<ActorId>,
    sitting: bool,
    stealthed: bool,
    roams: u32,
    returns: u32,
    events: Vec<ActorEvent>,
    ambient: Vec<AmbientTrigger>,
}

/// Actor with scripted state for driving schedulers and brains by hand.
#[derive(Debug)]
pub struct TestActor {
    id: ActorId,
    follow_up: bool,
    exclusivity: bool,
    can_roam: bool,
    tether: Option<u32>,
    abilities: Vec<AbilityId>,
    state: Mutex<TestState>,
}

impl TestActor {
    fn new(id: u32, follow_up: bool, can_roam: bool) -> Self {
        Self {
            id: ActorId(id),
            follow_up,
            exclusivity: false,
            can_roam,
            tether: None,
            abilities: vec![AbilityId(1)],
            state: Mutex::new(TestState {
                status: StatusFlags::empty(),
                position: Position::ORIGIN,
                spawn: Position::ORIGIN,
                heading: 0,
                target: None,
                resources: ResourceLevels::FULL,
                group: None,
                hostiles: Vec::new(),
                attacking: None,
                in_combat: None,
                last_combat_at: None,
                following: None,
                sitting: false,
                stealthed: false,
                roams: 0,
                returns: 0,
                events: Vec::new(),
                ambient: Vec::new(),
            }),
        }
    }

    /// A player character: keeps follow-up casts.
    pub fn player(id: u32) -> Self {
        Self::new(id, true, false)
    }

    /// A wild mob: rejects mid-cast requests and may roam.
    pub fn npc(id: u32) -> Self {
        Self::new(id, false, true)
    }

    pub fn stationary(mut self) -> Self {
        self.can_roam = false;
        self
    }

    pub fn with_exclusivity(mut self) -> Self {
        self.exclusivity = true;
        self
    }

    pub fn with_tether(mut self, range: u32) -> Self {
        self.tether = Some(range);
        self
    }

    pub fn set_status(&self, status: StatusFlags) {
        self.state.lock().unwrap().status = status;
    }

    pub fn set_group(&self, group: Option<GroupView>) {
        self.state.lock().unwrap().group = group;
    }

    pub fn set_position(&self, position: Position) {
        self.state.lock().unwrap().position = position;
    }

    pub fn set_resources(&self, resources: ResourceLevels) {
        self.state.lock().unwrap().resources = resources;
    }

    pub fn set_in_combat(&self, in_combat: Option<bool>) {
        self.state.lock().unwrap().in_combat = in_combat;
    }

    pub fn set_last_combat_at(&self, at: Option<Tick>) {
        self.state.lock().unwrap().last_combat_at = at;
    }

    pub fn add_hostile(&self, hostile: ActorId, position: Position) {
        self.state.lock().unwrap().hostiles.push((hostile, position));
    }

    pub fn clear_hostiles(&self) {
        self.state.lock().unwrap().hostiles.clear();
    }

    pub fn events(&self) -> Vec<ActorEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn cast_failures(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ActorEvent::CastFailed(CastFailedReason::CrowdControlled)))
            .count()
    }

    pub fn roams(&self) -> u32 {
        self.state.lock().unwrap().roams
    }

    pub fn returns(&self) -> u32 {
        self.state.lock().unwrap().returns
    }

    pub fn attacking(&self) -> Option<ActorId> {
        self.state.lock().unwrap().attacking
    }

    pub fn ambient(&self) -> Vec<AmbientTrigger> {
        self.state.lock().unwrap().ambient.clone()
    }
}

impl Actor for TestActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn status(&self) -> StatusFlags {
        self.state.lock().unwrap().status
    }

    fn position(&self) -> Position {
        self.state.lock().unwrap().position
    }

    fn current_target(&self) -> Option<ActorId> {
        self.state.lock().unwrap().target
    }

    fn resources(&self) -> ResourceLevels {
        self.state.lock().unwrap().resources
    }

    fn supports_follow_up_casting(&self) -> bool {
        self.follow_up
    }

    fn enforces_cast_exclusivity(&self) -> bool {
        self.exclusivity
    }

    fn notify(&self, event: ActorEvent) {
        self.state.lock().unwrap().events.push(event);
    }

    fn execute_ability(&self, ability: AbilityId) -> Result<(), AbilityError> {
        if self.abilities.contains(&ability) {
            Ok(())
        } else {
            Err(AbilityError::Unavailable(ability))
        }
    }
}

impl Body for TestActor {
    fn group(&self) -> Option<GroupView> {
        self.state.lock().unwrap().group.clone()
    }

    fn spawn_point(&self) -> Position {
        self.state.lock().unwrap().spawn
    }

    fn set_spawn_point(&self, point: Position) {
        self.state.lock().unwrap().spawn = point;
    }

    fn spawn_heading(&self) -> u16 {
        90
    }

    fn turn_to(&self, heading: u16) {
        self.state.lock().unwrap().heading = heading;
    }

    fn tether_range(&self) -> Option<u32> {
        self.tether
    }

    fn has_patrol_path(&self) -> bool {
        false
    }

    fn can_roam(&self) -> bool {
        self.can_roam
    }

    fn in_dungeon(&self) -> bool {
        false
    }

    fn is_attacking(&self) -> bool {
        self.state.lock().unwrap().attacking.is_some()
    }

    fn in_combat(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.in_combat.unwrap_or(state.attacking.is_some())
    }

    fn last_combat_at(&self) -> Option<Tick> {
        self.state.lock().unwrap().last_combat_at
    }

    fn is_engaging(&self) -> bool {
        self.is_attacking()
    }

    fn hostiles_within(&self, range: u32) -> Vec<ActorId> {
        let state = self.state.lock().unwrap();
        state
            .hostiles
            .iter()
            .filter(|(_, at)| at.within(&state.position, range))
            .map(|(id, _)| *id)
            .collect()
    }

    fn attack(&self, target: ActorId) {
        let mut state = self.state.lock().unwrap();
        state.attacking = Some(target);
        state.target = Some(target);
    }

    fn stop_attack(&self) {
        self.state.lock().unwrap().attacking = None;
    }

    fn clear_target(&self) {
        self.state.lock().unwrap().target = None;
    }

    fn is_moving(&self) -> bool {
        false
    }

    fn current_speed(&self) -> u32 {
        0
    }

    fn max_speed(&self) -> u32 {
        200
    }

    fn follow(&self, leader: ActorId) {
        self.state.lock().unwrap().following = Some(leader);
    }

    fn stop_following(&self) {
        self.state.lock().unwrap().following = None;
    }

    fn follow_target(&self) -> Option<ActorId> {
        self.state.lock().unwrap().following
    }

    fn return_to_spawn(&self, _speed: u32) {
        let mut state = self.state.lock().unwrap();
        state.position = state.spawn;
        state.returns += 1;
    }

    fn is_returning_to_spawn(&self) -> bool {
        false
    }

    fn move_on_path(&self, _speed: u32) {}

    fn roam(&self, _speed: u32, _range: u32) {
        self.state.lock().unwrap().roams += 1;
    }

    fn stop_moving(&self) {}

    fn is_sitting(&self) -> bool {
        self.state.lock().unwrap().sitting
    }

    fn sit(&self, sitting: bool) {
        self.state.lock().unwrap().sitting = sitting;
    }

    fn is_stealthed(&self) -> bool {
        self.state.lock().unwrap().stealthed
    }

    fn was_stealthed(&self) -> bool {
        false
    }

    fn set_stealth(&self, stealthed: bool) {
        self.state.lock().unwrap().stealthed = stealthed;
    }

    fn fire_ambient(&self, trigger: AmbientTrigger) {
        self.state.lock().unwrap().ambient.push(trigger);
    }

    fn defensive_spell(&self) -> Option<SpellChoice> {
        None
    }

    fn offensive_spell(&self, _target: ActorId) -> Option<SpellChoice> {
        None
    }

    fn defensive_abilities(&self) -> Vec<AbilityId> {
        Vec::new()
    }

    fn offensive_abilities(&self) -> Vec<AbilityId> {
        Vec::new()
    }
}

pub fn line() -> SpellLine {
    SpellLine::new("test")
}

pub fn spell(id: u32, cast_time_ms: u64) -> Arc<Spell> {
    Arc::new(Spell::new(SpellId(id), format!("spell {id}"), cast_time_ms))
}

pub fn service(feedback: Arc<RecordingFeedback>) -> CastingService {
    CastingService::new(
        Arc::new(StandardActionProvider),
        feedback,
        FocusPolicy::Preempt,
    )
}

/// Attaches `actor` to `service` and builds its brain.
pub fn brain(
    actor: &Arc<TestActor>,
    service: &mut CastingService,
    tuning: BrainTuning,
    hooks: Vec<Arc<dyn BrainHook>>,
) -> Brain {
    let casting = service.attach(Arc::clone(actor) as Arc<dyn Actor>);
    let ctx = BrainContext::new(
        Arc::clone(actor) as Arc<dyn Body>,
        casting,
        service.directory(),
        tuning,
        Arc::new(PcgRng),
        7,
    );
    Brain::new(ctx, hooks).expect("standard table is complete")
}
