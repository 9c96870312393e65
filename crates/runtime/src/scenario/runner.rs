use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use sim_core::{AbilityId, Actor, ActorId, CastRequest, GroupView, Spell, SpellId, SpellLine, Tick};

use super::actor::SceneProfile;
use super::{Control, HookSpec, Scenario, SceneActor, SceneWorld, ScriptAction, StatusKind};
use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::brain::{BrainHook, OpportunisticCast, ResetOnDisengage, SpellChoice};
use crate::casting::CastingHandle;
use crate::runtime::RuntimeConfig;

struct Attached {
    actor: Arc<SceneActor>,
    casting: CastingHandle,
    line: SpellLine,
}

/// Replays a [`Scenario`] against a running runtime.
pub struct ScenarioRunner {
    scenario: Scenario,
    world: Arc<SceneWorld>,
    spells: HashMap<u32, Arc<Spell>>,
    actors: BTreeMap<ActorId, Attached>,
    cursor: usize,
}

impl Scenario {
    /// Runtime configuration matching this scenario's clock and seed.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            sim: self.sim.clone(),
            ..RuntimeConfig::default()
        }
        .with_seed(self.seed)
    }
}

impl ScenarioRunner {
    /// Places every actor and attaches it to the runtime.
    pub async fn setup(mut scenario: Scenario, runtime: &RuntimeHandle) -> Result<Self> {
        scenario.validate()?;
        scenario.script.sort_by_key(|entry| entry.at_ms);

        let world = Arc::new(SceneWorld::new());
        let spells: HashMap<u32, Arc<Spell>> = scenario
            .spells
            .iter()
            .map(|spec| (spec.id, Arc::new(spec.to_spell())))
            .collect();

        for spec in &scenario.actors {
            world.place(ActorId(spec.id), spec.position, spec.faction);
        }

        let mut groups: HashMap<u32, GroupView> = HashMap::new();
        for group in &scenario.groups {
            let mut view = GroupView::new(
                ActorId(group.leader),
                group.members.iter().copied().map(ActorId).collect(),
            );
            if let Some(camp_point) = group.camp_point {
                view = view.with_camp_point(camp_point);
            }
            for member in &group.members {
                groups.insert(*member, view.clone());
            }
        }

        let mut actors = BTreeMap::new();
        for spec in &scenario.actors {
            let id = ActorId(spec.id);
            let line = SpellLine::new(spec.line.clone());
            let choice = |spell: Option<u32>| {
                spell
                    .and_then(|spell| spells.get(&spell))
                    .map(|spell| SpellChoice::new(Arc::clone(spell), line.clone()))
            };

            let profile = SceneProfile {
                follow_up: spec.control == Control::Player,
                enforce_exclusivity: spec.enforce_exclusivity,
                can_roam: spec.can_roam,
                patrol: spec.patrol,
                in_dungeon: spec.in_dungeon,
                tether: spec.tether,
                max_speed: spec.max_speed,
                defensive_spell: choice(spec.defensive_spell),
                offensive_spell: choice(spec.offensive_spell),
                abilities: spec.abilities.iter().copied().map(AbilityId).collect(),
            };
            let actor = Arc::new(SceneActor::new(
                id,
                spec.name.clone(),
                Arc::clone(&world),
                profile,
                spec.heading,
                spec.resources,
                spec.stealthed,
            ));
            actor.set_group(groups.get(&spec.id).cloned());

            let casting = match spec.control {
                Control::Player => runtime.attach(Arc::clone(&actor) as Arc<dyn Actor>).await?,
                Control::Brain => {
                    let hooks = spec
                        .hooks
                        .iter()
                        .filter_map(|hook| build_hook(hook, &spells, &line))
                        .collect();
                    runtime.attach_brain(Arc::clone(&actor), hooks).await?
                }
            };
            debug!(target: "runtime::scenario", actor = %id, name = %spec.name, control = ?spec.control, "actor attached");

            actors.insert(
                id,
                Attached {
                    actor,
                    casting,
                    line,
                },
            );
        }

        info!(
            target: "runtime::scenario",
            scenario = %scenario.name,
            actors = actors.len(),
            script = scenario.script.len(),
            "scenario ready"
        );

        Ok(Self {
            scenario,
            world,
            spells,
            actors,
            cursor: 0,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn world(&self) -> &Arc<SceneWorld> {
        &self.world
    }

    pub fn actor(&self, id: ActorId) -> Option<&Arc<SceneActor>> {
        self.actors.get(&id).map(|attached| &attached.actor)
    }

    pub fn casting(&self, id: ActorId) -> Option<&CastingHandle> {
        self.actors.get(&id).map(|attached| &attached.casting)
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    /// Returns true once every script entry has been issued.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.scenario.script.len()
    }

    /// Issues every entry due at the current time, then advances one tick.
    pub async fn step(&mut self, runtime: &RuntimeHandle) -> Result<Tick> {
        let now = runtime.now().await?;
        self.issue_due(runtime, now).await?;

        self.world
            .set_now(now + self.scenario.sim.tick_interval_ms);
        let now = runtime.step(1).await?;
        self.world.set_now(now);
        Ok(now)
    }

    pub async fn run(&mut self, runtime: &RuntimeHandle, ticks: u32) -> Result<Tick> {
        let mut now = runtime.now().await?;
        for _ in 0..ticks {
            now = self.step(runtime).await?;
        }
        Ok(now)
    }

    async fn issue_due(&mut self, runtime: &RuntimeHandle, now: Tick) -> Result<()> {
        while let Some(entry) = self.scenario.script.get(self.cursor) {
            if entry.at_ms > now.0 {
                break;
            }
            let action = entry.action.clone();
            self.cursor += 1;

            debug!(target: "runtime::scenario", %now, ?action, "script");
            match self.issue(runtime, action).await {
                Err(RuntimeError::UnknownActor(actor)) => {
                    warn!(target: "runtime::scenario", %actor, "script entry skipped: actor is not attached or has no brain");
                }
                other => other?,
            }
        }
        Ok(())
    }

    async fn issue(&self, runtime: &RuntimeHandle, action: ScriptAction) -> Result<()> {
        match action {
            ScriptAction::Cast {
                actor,
                spell,
                target,
            } => {
                let attached = self.attached(actor)?;
                let spell = self.spell(spell)?;
                let mut request = CastRequest::new(spell, attached.line.clone());
                if let Some(target) = target {
                    request = request.with_target(ActorId(target));
                }
                if !attached.casting.request_cast(request) {
                    debug!(target: "runtime::scenario", actor, "cast request refused");
                }
            }
            ScriptAction::UseAbility { actor, ability } => {
                self.attached(actor)?
                    .casting
                    .request_ability(AbilityId(ability));
            }
            ScriptAction::Interrupt { actor } => {
                runtime.interrupt(ActorId(actor)).await?;
            }
            ScriptAction::Kill { actor } => {
                self.world.set_alive(ActorId(actor), false);
                runtime.kill(ActorId(actor)).await?;
            }
            ScriptAction::Revive { actor } => {
                if runtime.revive(ActorId(actor)).await? {
                    self.world.set_alive(ActorId(actor), true);
                }
            }
            ScriptAction::Hostility {
                actor,
                attacker,
                amount,
            } => {
                runtime
                    .add_hostility(ActorId(actor), ActorId(attacker), amount)
                    .await?;
            }
            ScriptAction::SetStatus { actor, status } => {
                self.attached(actor)?
                    .actor
                    .set_status(StatusKind::flags(&status));
            }
            ScriptAction::Move { actor, to } => {
                self.attached(actor)?.actor.move_to(to);
            }
            ScriptAction::CancelEffect { owner, spell } => {
                runtime.cancel_effect(ActorId(owner), SpellId(spell)).await?;
            }
        }
        Ok(())
    }

    fn attached(&self, actor: u32) -> Result<&Attached> {
        self.actors
            .get(&ActorId(actor))
            .ok_or(RuntimeError::UnknownActor(ActorId(actor)))
    }

    fn spell(&self, spell: u32) -> Result<Arc<Spell>> {
        self.spells
            .get(&spell)
            .cloned()
            .ok_or_else(|| RuntimeError::InvalidScenario(format!("unknown spell {}", spell)))
    }
}

fn build_hook(
    hook: &HookSpec,
    spells: &HashMap<u32, Arc<Spell>>,
    line: &SpellLine,
) -> Option<Arc<dyn BrainHook>> {
    match hook {
        HookSpec::ResetOnDisengage => Some(Arc::new(ResetOnDisengage)),
        HookSpec::OpportunisticCast { spell, chance } => spells.get(spell).map(|spell| {
            Arc::new(OpportunisticCast::new(Arc::clone(spell), line.clone(), *chance))
                as Arc<dyn BrainHook>
        }),
    }
}
