mod support;

use std::sync::Arc;

use runtime::{AmbientTrigger, Body, BrainHook, BrainState, OpportunisticCast, ResetOnDisengage};
use sim_core::{
    Actor, ActorId, BrainTuning, GroupView, Position, ResourceLevels, StatusFlags, Tick,
};
use support::{RecordingFeedback, TestActor, brain, line, service, spell};

fn eager_roamer() -> BrainTuning {
    BrainTuning {
        random_walk_chance: 100,
        ..BrainTuning::default()
    }
}

#[test]
fn wakes_up_into_roaming_and_respects_cooldown() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1));
    let mut brain = brain(&actor, &mut casting, eager_roamer(), Vec::new());

    let change = brain.think(Tick(50));
    assert_eq!(change.map(|c| (c.from, c.to)), Some((BrainState::WakingUp, BrainState::Roaming)));
    assert!(!brain.context().needs_init);

    brain.think(Tick(100));
    assert_eq!(actor.roams(), 1);
    assert_eq!(actor.ambient(), vec![AmbientTrigger::Roaming]);

    brain.think(Tick(5_000));
    assert_eq!(actor.roams(), 1);

    brain.think(Tick(10_100));
    assert_eq!(actor.roams(), 2);
    assert_eq!(brain.state(), BrainState::Roaming);
}

#[test]
fn stationary_actor_without_work_idles_and_rests() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Idle);

    actor.set_resources(ResourceLevels {
        health: 50,
        ..ResourceLevels::FULL
    });
    brain.think(Tick(100));
    assert!(actor.is_sitting());

    actor.set_resources(ResourceLevels::FULL);
    brain.think(Tick(150));
    assert!(!actor.is_sitting());
}

#[test]
fn hostile_in_range_starts_a_fight() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(300, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);
    assert!(brain.context().hostility.contains(ActorId(9)));
    assert!(actor.ambient().contains(&AmbientTrigger::Aggroing));

    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Aggro);
    assert_eq!(actor.attacking(), Some(ActorId(9)));
}

#[test]
fn hostile_out_of_range_is_ignored() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(5_000, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Idle);
    assert!(brain.context().hostility.is_empty());
}

#[test]
fn solo_actor_walks_home_once_the_table_empties() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(300, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    brain.think(Tick(150));
    assert_eq!(brain.state(), BrainState::ReturnToSpawn);
    assert_eq!(actor.attacking(), None);
    assert_eq!(actor.returns(), 1);

    brain.think(Tick(200));
    assert_eq!(brain.state(), BrainState::WakingUp);
    brain.think(Tick(250));
    assert_eq!(brain.state(), BrainState::Idle);
}

#[test]
fn stunned_actor_cannot_leave_aggro() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(300, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    actor.set_status(StatusFlags::STUNNED);

    brain.think(Tick(100));
    brain.think(Tick(150));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.set_status(StatusFlags::empty());
    brain.think(Tick(200));
    assert_eq!(brain.state(), BrainState::ReturnToSpawn);
}

#[test]
fn group_leader_takes_camp_and_returns_to_it() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    let camp_point = Position::new(1_000, 0, 0);
    actor.set_group(Some(
        GroupView::new(ActorId(1), vec![ActorId(1), ActorId(2)]).with_camp_point(camp_point),
    ));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Camp);
    assert_eq!(brain.context().settings.aggro_range, BrainTuning::DEFAULT_GROUP_AGGRO_RANGE);
    let anchor = actor.spawn_point();
    assert!((anchor.x - camp_point.x).abs() <= 100);
    assert!((anchor.y - camp_point.y).abs() <= 100);
    assert_eq!(actor.position(), anchor);

    actor.add_hostile(ActorId(9), camp_point);
    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    brain.think(Tick(150));
    assert_eq!(brain.state(), BrainState::Camp);

    // Dropping the camp point sends the leader back through wake-up.
    actor.set_group(Some(GroupView::new(ActorId(1), vec![ActorId(1), ActorId(2)])));
    brain.think(Tick(200));
    assert_eq!(brain.state(), BrainState::WakingUp);
}

#[test]
fn group_leader_without_camp_idles_after_a_fight() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.set_group(Some(GroupView::new(ActorId(1), vec![ActorId(1)])));
    actor.add_hostile(ActorId(9), Position::new(100, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Idle);
}

#[test]
fn grace_window_ends_aggro_with_hostility_left() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(300, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);
    actor.set_in_combat(Some(false));

    brain.think(Tick(25_000));
    assert_eq!(brain.state(), BrainState::Aggro);
    assert!(brain.context().hostility.contains(ActorId(9)));

    // Recent combat keeps the window open.
    actor.set_last_combat_at(Some(Tick(20_000)));
    brain.think(Tick(25_050));
    assert_eq!(brain.state(), BrainState::Aggro);

    brain.think(Tick(45_000));
    assert_eq!(brain.state(), BrainState::ReturnToSpawn);
    assert!(brain.context().hostility.is_empty());
    assert_eq!(actor.attacking(), None);
}

#[test]
fn defending_leader_with_camp_point_goes_back_to_camp() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    let camp_point = Position::new(1_000, 0, 0);
    actor.set_group(Some(
        GroupView::new(ActorId(1), vec![ActorId(1), ActorId(2)]).with_camp_point(camp_point),
    ));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Camp);
    let settings = &mut brain.context_mut().settings;
    settings.pvp_mode = true;
    settings.roam = false;
    settings.defend = true;

    actor.add_hostile(ActorId(9), camp_point);
    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    actor.set_in_combat(Some(false));
    actor.set_last_combat_at(Some(Tick(100)));
    brain.think(Tick(25_100));
    assert_eq!(brain.state(), BrainState::Camp);
}

fn pvp_leader_exit(roam: bool, defend: bool) -> BrainState {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.set_group(Some(GroupView::new(ActorId(1), vec![ActorId(1)])));
    actor.add_hostile(ActorId(9), Position::new(100, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);
    let settings = &mut brain.context_mut().settings;
    settings.pvp_mode = true;
    settings.roam = roam;
    settings.defend = defend;

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    brain.think(Tick(100));
    brain.state()
}

#[test]
fn pvp_leader_leaves_aggro_by_combat_mode() {
    assert_eq!(pvp_leader_exit(true, false), BrainState::Roaming);
    assert_eq!(pvp_leader_exit(false, true), BrainState::ReturnToSpawn);
    assert_eq!(pvp_leader_exit(false, false), BrainState::Idle);
}

#[test]
fn follower_trails_its_leader() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(2));
    actor.set_group(Some(GroupView::new(ActorId(1), vec![ActorId(1), ActorId(2)])));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::FollowLeader);
    assert_eq!(actor.follow_target(), Some(ActorId(1)));
    assert_eq!(brain.context().settings.aggro_range, BrainTuning::DEFAULT_GROUP_AGGRO_RANGE);

    actor.set_group(None);
    brain.think(Tick(100));
    assert_eq!(brain.state(), BrainState::Idle);
    assert_eq!(actor.follow_target(), None);
    assert_eq!(brain.context().settings.aggro_range, BrainTuning::DEFAULT_WIDE_AGGRO_RANGE);
}

#[test]
fn leaving_the_tether_sends_actor_home() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).with_tether(100));
    actor.set_position(Position::new(500, 0, 0));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::ReturnToSpawn);
    assert_eq!(actor.returns(), 1);
    assert_eq!(actor.position(), Position::ORIGIN);
}

#[test]
fn casting_group_member_suppresses_roaming() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let leader = Arc::new(TestActor::npc(1));
    let member = Arc::new(TestActor::npc(2));
    let group = GroupView::new(ActorId(1), vec![ActorId(1), ActorId(2)]);
    leader.set_group(Some(group.clone()));
    member.set_group(Some(group));

    let member_casting = casting.attach(Arc::clone(&member) as Arc<dyn Actor>);
    let mut brain = brain(&leader, &mut casting, eager_roamer(), Vec::new());

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Roaming);

    member_casting.cast(spell(10, 5_000), line());
    casting.tick(Tick(50));
    brain.think(Tick(100));
    assert_eq!(leader.roams(), 0);

    casting.tick(Tick(5_050));
    brain.think(Tick(5_100));
    assert_eq!(leader.roams(), 1);
}

#[test]
fn dead_brain_waits_for_revival() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    let hooks: Vec<Arc<dyn BrainHook>> =
        vec![Arc::new(OpportunisticCast::new(spell(5, 1000), line(), 100))];
    let mut brain = brain(&actor, &mut casting, eager_roamer(), hooks);

    brain.think(Tick(50));
    brain.on_death(Tick(100));
    brain.add_hostility(ActorId(9), 10);
    actor.add_hostile(ActorId(9), Position::new(100, 0, 0));

    for now in [150, 200, 5_000, 30_000] {
        assert_eq!(brain.think(Tick(now)), None);
        assert_eq!(brain.state(), BrainState::Dead);
        casting.tick(Tick(now));
    }
    assert!(brain.context().hostility.is_empty());
    assert_eq!(actor.attacking(), None);
    assert!(!brain.context().casting.is_casting());
    assert!(actor.events().is_empty());

    let change = brain.revive(Tick(30_050));
    assert_eq!(
        change.map(|c| (c.from, c.to)),
        Some((BrainState::Dead, BrainState::WakingUp))
    );
    assert_eq!(brain.revive(Tick(30_100)), None);
}

#[test]
fn death_reinitializes_settings_on_wake_up() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1));
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), Vec::new());

    brain.think(Tick(50));
    brain.context_mut().settings.pvp_mode = true;
    brain.add_hostility(ActorId(9), 10);

    let change = brain.on_death(Tick(100));
    assert_eq!(change.map(|c| c.to), Some(BrainState::Dead));
    assert!(brain.context().needs_init);
    assert!(brain.context().hostility.is_empty());

    brain.think(Tick(150));
    assert_eq!(brain.state(), BrainState::Dead);
    brain.revive(Tick(175));
    assert_eq!(brain.state(), BrainState::WakingUp);
    brain.think(Tick(200));
    assert!(!brain.context().settings.pvp_mode);
    assert_eq!(brain.state(), BrainState::Roaming);
}

#[test]
fn reset_hook_overrides_the_exit_target() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.set_group(Some(GroupView::new(ActorId(1), vec![ActorId(1)])));
    actor.add_hostile(ActorId(9), Position::new(100, 0, 0));
    let hooks: Vec<Arc<dyn BrainHook>> = vec![Arc::new(ResetOnDisengage)];
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), hooks);

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);

    actor.clear_hostiles();
    brain.context_mut().clear_hostility();
    let change = brain.think(Tick(100));
    assert_eq!(change.map(|c| c.to), Some(BrainState::ReturnToSpawn));
}

#[test]
fn opportunistic_cast_targets_most_hated() {
    let mut casting = service(Arc::new(RecordingFeedback::default()));
    let actor = Arc::new(TestActor::npc(1).stationary());
    actor.add_hostile(ActorId(9), Position::new(100, 0, 0));
    let hooks: Vec<Arc<dyn BrainHook>> =
        vec![Arc::new(OpportunisticCast::new(spell(80, 2_000), line(), 100))];
    let mut brain = brain(&actor, &mut casting, BrainTuning::default(), hooks);

    brain.think(Tick(50));
    assert_eq!(brain.state(), BrainState::Aggro);

    brain.think(Tick(100));
    casting.tick(Tick(100));
    let scheduler = casting.scheduler(ActorId(1)).unwrap();
    let active = scheduler.active().unwrap();
    assert_eq!(active.spell().id.0, 80);
    assert_eq!(active.target(), Some(ActorId(9)));
}
