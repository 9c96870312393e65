mod support;

use std::sync::Arc;

use tokio::sync::broadcast;

use runtime::{
    BrainEvent, BrainState, CastingEvent, EffectEvent, Event, Runtime, RuntimeError, Topic,
};
use sim_core::{
    ActorId, Audience, Feedback, Position, Spell, SpellId, StandingEffect, StatKind, Tick,
};
use support::{RecordingFeedback, TestActor, line, spell};

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn blessing() -> Arc<Spell> {
    Arc::new(
        Spell::new(SpellId(10), "blessing", 100).with_effect(StandingEffect {
            stat: StatKind::Strength,
            amount: 5,
            duration_ms: Some(500),
        }),
    )
}

#[tokio::test]
async fn full_encounter_through_the_runtime() {
    println!("\n════════════════════════════════════════════════════════");
    println!("  Casting runtime: end-to-end encounter");
    println!("════════════════════════════════════════════════════════\n");

    // ================================================================
    // PHASE 1: Runtime setup
    // ================================================================
    println!("PHASE 1: Starting runtime");

    let feedback = Arc::new(RecordingFeedback::default());
    let runtime = Runtime::builder()
        .feedback(feedback.clone())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    let mut casting_rx = handle.subscribe(Topic::Casting);
    let mut brain_rx = handle.subscribe(Topic::Brain);
    let mut effects_rx = handle.subscribe(Topic::Effects);

    assert_eq!(handle.now().await.unwrap(), Tick::ZERO);
    println!("✓ Runtime started at {}", Tick::ZERO);

    // ================================================================
    // PHASE 2: Player buff lands and expires
    // ================================================================
    println!("\nPHASE 2: Player casts a timed buff");

    let player = Arc::new(TestActor::player(1));
    let player_casting = handle.attach(player.clone()).await.unwrap();
    assert!(player_casting.cast(blessing(), line()));

    let now = handle.step(1).await.unwrap();
    assert_eq!(now, Tick(50));
    let snapshot = handle.query_actor(ActorId(1)).await.unwrap().unwrap();
    assert_eq!(snapshot.active, Some(SpellId(10)));
    assert!(snapshot.registered);

    handle.step(2).await.unwrap();
    let events = drain(&mut casting_rx);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Casting(CastingEvent::Completed { spell: SpellId(10), at: Tick(150), .. })
    )));
    assert_eq!(
        drain(&mut effects_rx),
        vec![Event::Effects(EffectEvent::Applied {
            owner: ActorId(1),
            caster: ActorId(1),
            spell: SpellId(10),
            stat: StatKind::Strength,
            amount: 5,
        })]
    );
    let snapshot = handle.query_actor(ActorId(1)).await.unwrap().unwrap();
    assert_eq!(snapshot.bonuses.get(&StatKind::Strength), Some(&5));
    assert!(!snapshot.registered);
    println!("✓ Buff applied: {:?}", snapshot.bonuses);

    handle.step(10).await.unwrap();
    assert_eq!(
        drain(&mut effects_rx),
        vec![Event::Effects(EffectEvent::Expired {
            owner: ActorId(1),
            spell: SpellId(10),
        })]
    );
    println!("✓ Buff expired at {}", handle.now().await.unwrap());

    // ================================================================
    // PHASE 3: NPC notices the player and fights
    // ================================================================
    println!("\nPHASE 3: NPC aggro");

    let npc = Arc::new(TestActor::npc(2).stationary());
    npc.add_hostile(ActorId(1), Position::new(100, 0, 0));
    handle.attach_brain(npc.clone(), Vec::new()).await.unwrap();

    let at = handle.step(1).await.unwrap();
    assert_eq!(
        drain(&mut brain_rx),
        vec![Event::Brain(BrainEvent::Transition {
            actor: ActorId(2),
            from: BrainState::WakingUp,
            to: BrainState::Aggro,
            at,
        })]
    );
    handle.step(1).await.unwrap();
    let snapshot = handle.query_actor(ActorId(2)).await.unwrap().unwrap();
    assert_eq!(snapshot.brain_state, Some(BrainState::Aggro));
    assert_eq!(snapshot.hostility, vec![(ActorId(1), 1)]);
    assert_eq!(npc.attacking(), Some(ActorId(1)));
    println!("✓ NPC attacks {}", ActorId(1));

    // ================================================================
    // PHASE 4: Interrupt and death
    // ================================================================
    println!("\nPHASE 4: Interrupt and death");

    player_casting.cast(spell(11, 3_000), line());
    handle.step(1).await.unwrap();
    drain(&mut casting_rx);
    feedback.clear();

    assert!(handle.interrupt(ActorId(1)).await.unwrap());
    assert!(matches!(
        drain(&mut casting_rx).as_slice(),
        [Event::Casting(CastingEvent::Interrupted { actor: ActorId(1), spell: SpellId(11), .. })]
    ));
    assert_eq!(
        feedback.entries(),
        vec![(
            ActorId(1),
            Audience::Nearby,
            Feedback::Interrupted { spell: SpellId(11) }
        )]
    );

    handle.kill(ActorId(2)).await.unwrap();
    let events = drain(&mut brain_rx);
    assert!(matches!(
        events.as_slice(),
        [
            Event::Brain(BrainEvent::Transition { to: BrainState::Dead, .. }),
            Event::Brain(BrainEvent::Died { actor: ActorId(2), .. }),
        ]
    ));
    let snapshot = handle.query_actor(ActorId(2)).await.unwrap().unwrap();
    assert_eq!(snapshot.brain_state, Some(BrainState::Dead));
    assert!(snapshot.hostility.is_empty());

    handle.step(3).await.unwrap();
    let snapshot = handle.query_actor(ActorId(2)).await.unwrap().unwrap();
    assert_eq!(snapshot.brain_state, Some(BrainState::Dead));
    drain(&mut brain_rx);

    assert!(handle.revive(ActorId(2)).await.unwrap());
    assert!(!handle.revive(ActorId(2)).await.unwrap());
    assert!(matches!(
        drain(&mut brain_rx).as_slice(),
        [
            Event::Brain(BrainEvent::Transition { from: BrainState::Dead, to: BrainState::WakingUp, .. }),
            Event::Brain(BrainEvent::Revived { actor: ActorId(2), .. }),
        ]
    ));
    println!("✓ NPC died and was revived");

    // ================================================================
    // PHASE 5: Shutdown
    // ================================================================
    drop(handle);
    runtime.shutdown().await.expect("worker should stop cleanly");
    println!("\n✓ Runtime shut down");
}

#[tokio::test]
async fn unknown_actors_are_reported() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();

    assert!(matches!(
        handle.interrupt(ActorId(42)).await,
        Err(RuntimeError::UnknownActor(ActorId(42)))
    ));
    assert!(matches!(
        handle.kill(ActorId(42)).await,
        Err(RuntimeError::UnknownActor(ActorId(42)))
    ));
    assert!(matches!(
        handle.add_hostility(ActorId(42), ActorId(1), 5).await,
        Err(RuntimeError::UnknownActor(ActorId(42)))
    ));
    assert_eq!(handle.query_actor(ActorId(42)).await.unwrap(), None);
}

#[tokio::test]
async fn hostility_from_attacks_pulls_npc_into_aggro() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    let mut brain_rx = handle.subscribe(Topic::Brain);

    let npc = Arc::new(TestActor::npc(3).stationary());
    handle.attach_brain(npc.clone(), Vec::new()).await.unwrap();
    handle.step(1).await.unwrap();
    assert_eq!(
        handle.query_actor(ActorId(3)).await.unwrap().unwrap().brain_state,
        Some(BrainState::Idle)
    );

    // Nobody is in range; the attack alone is enough to engage.
    handle.add_hostility(ActorId(3), ActorId(7), 40).await.unwrap();
    handle.step(1).await.unwrap();

    let transitions: Vec<_> = drain(&mut brain_rx)
        .into_iter()
        .filter_map(|event| match event {
            Event::Brain(BrainEvent::Transition { to, .. }) => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(transitions, vec![BrainState::Idle, BrainState::Aggro]);

    handle.step(1).await.unwrap();
    assert_eq!(npc.attacking(), Some(ActorId(7)));
    let snapshot = handle.query_actor(ActorId(3)).await.unwrap().unwrap();
    assert_eq!(snapshot.hostility, vec![(ActorId(7), 40)]);
}

#[tokio::test]
async fn cancelling_a_standing_effect() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    let mut effects_rx = handle.subscribe(Topic::Effects);

    let player = Arc::new(TestActor::player(1));
    let casting = handle.attach(player).await.unwrap();
    let permanent = Arc::new(
        Spell::new(SpellId(20), "stoneskin", 0).with_effect(StandingEffect {
            stat: StatKind::ArmorFactor,
            amount: 12,
            duration_ms: None,
        }),
    );
    casting.cast(permanent, line());
    handle.step(1).await.unwrap();
    assert!(matches!(
        drain(&mut effects_rx).as_slice(),
        [Event::Effects(EffectEvent::Applied { amount: 12, .. })]
    ));

    handle.cancel_effect(ActorId(1), SpellId(20)).await.unwrap();
    handle.cancel_effect(ActorId(1), SpellId(20)).await.unwrap();
    handle.step(1).await.unwrap();
    assert_eq!(
        drain(&mut effects_rx),
        vec![
            Event::Effects(EffectEvent::Cancelled {
                owner: ActorId(1),
                spell: SpellId(20),
            }),
            Event::Effects(EffectEvent::CancelFailed {
                owner: ActorId(1),
                spell: SpellId(20),
            }),
        ]
    );
    let snapshot = handle.query_actor(ActorId(1)).await.unwrap().unwrap();
    assert!(snapshot.bonuses.is_empty());
}

#[tokio::test]
async fn attaching_twice_keeps_the_first_scheduler() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();

    let npc = Arc::new(TestActor::npc(4).stationary());
    let casting = handle.attach_brain(npc.clone(), Vec::new()).await.unwrap();

    assert!(matches!(
        handle.attach(npc.clone()).await,
        Err(RuntimeError::AlreadyAttached(ActorId(4)))
    ));
    assert!(matches!(
        handle.attach_brain(npc.clone(), Vec::new()).await,
        Err(RuntimeError::AlreadyAttached(ActorId(4)))
    ));

    // The original handle still feeds the live scheduler.
    assert!(casting.cast(spell(10, 1000), line()));
    handle.step(1).await.unwrap();
    let snapshot = handle.query_actor(ActorId(4)).await.unwrap().unwrap();
    assert_eq!(snapshot.active, Some(SpellId(10)));

    assert!(handle.detach(ActorId(4)).await.unwrap());
    assert!(handle.attach(npc).await.is_ok());
}
