use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, trace};

use sim_core::{ActionOutcome, ActorId, SpellId, StatKind, Tick};

use super::{EffectInstance, EffectList};
use crate::events::{EffectEvent, ResistReason};

/// Deferred operation on an actor's effect list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOp {
    Apply(EffectInstance),
    Cancel { owner: ActorId, spell: SpellId },
}

/// Downstream consumer of completed casts.
///
/// Operations are queued when outcomes arrive and drained on the pipeline's
/// own tick, after all casting schedulers have run.
#[derive(Debug, Default)]
pub struct EffectPipeline {
    queue: VecDeque<EffectOp>,
    lists: BTreeMap<ActorId, EffectList>,
}

impl EffectPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `actor` an empty effect list.
    pub fn attach(&mut self, actor: ActorId) {
        self.lists.entry(actor).or_default();
    }

    pub fn detach(&mut self, actor: ActorId) -> Option<EffectList> {
        self.lists.remove(&actor)
    }

    pub fn enqueue(&mut self, op: EffectOp) {
        self.queue.push_back(op);
    }

    pub fn cancel(&mut self, owner: ActorId, spell: SpellId) {
        self.enqueue(EffectOp::Cancel { owner, spell });
    }

    /// Queues the standing effect of a completed cast, if it carries one.
    ///
    /// Untargeted casts land on the caster.
    pub fn on_outcome(&mut self, outcome: &ActionOutcome, now: Tick) -> bool {
        let Some(effect) = outcome.spell.effect else {
            return false;
        };
        let owner = outcome.target.unwrap_or(outcome.owner);
        self.enqueue(EffectOp::Apply(EffectInstance::new(
            outcome.owner,
            owner,
            outcome.spell.id,
            effect,
            now,
        )));
        true
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Expires timed effects, then drains the queue in arrival order.
    pub fn tick(&mut self, now: Tick) -> Vec<EffectEvent> {
        let mut events = Vec::new();

        for (owner, list) in &mut self.lists {
            for spell in list.expired(now) {
                list.remove(spell);
                trace!(target: "runtime::effects", %owner, %spell, "effect expired");
                events.push(EffectEvent::Expired {
                    owner: *owner,
                    spell,
                });
            }
        }

        while let Some(op) = self.queue.pop_front() {
            events.push(match op {
                EffectOp::Apply(instance) => self.apply(instance),
                EffectOp::Cancel { owner, spell } => self.remove(owner, spell),
            });
        }

        events
    }

    fn apply(&mut self, instance: EffectInstance) -> EffectEvent {
        let owner = instance.owner;
        let caster = instance.caster;
        let spell = instance.spell;
        let effect = instance.effect;

        let reason = match self.lists.get_mut(&owner) {
            None => ResistReason::NoTarget,
            Some(list) => {
                if !list.add(instance) {
                    ResistReason::AlreadyPresent
                } else {
                    debug!(
                        target: "runtime::effects",
                        %owner,
                        %caster,
                        %spell,
                        stat = %effect.stat,
                        amount = effect.amount,
                        "effect applied"
                    );
                    return EffectEvent::Applied {
                        owner,
                        caster,
                        spell,
                        stat: effect.stat,
                        amount: effect.amount,
                    };
                }
            }
        };

        debug!(target: "runtime::effects", %owner, %caster, %spell, ?reason, "effect resisted");
        EffectEvent::Resisted {
            owner,
            caster,
            spell,
            reason,
        }
    }

    fn remove(&mut self, owner: ActorId, spell: SpellId) -> EffectEvent {
        match self.lists.get_mut(&owner).and_then(|list| list.remove(spell)) {
            Some(_) => {
                debug!(target: "runtime::effects", %owner, %spell, "effect cancelled");
                EffectEvent::Cancelled { owner, spell }
            }
            None => EffectEvent::CancelFailed { owner, spell },
        }
    }

    pub fn bonus(&self, actor: ActorId, stat: StatKind) -> i32 {
        self.lists.get(&actor).map_or(0, |list| list.bonus(stat))
    }

    pub fn has_effect(&self, actor: ActorId, spell: SpellId) -> bool {
        self.lists
            .get(&actor)
            .is_some_and(|list| list.contains(spell))
    }

    pub fn effects(&self, actor: ActorId) -> Option<&EffectList> {
        self.lists.get(&actor)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sim_core::{Spell, SpellLine, StandingEffect};

    use super::*;

    fn buff() -> Arc<Spell> {
        Arc::new(Spell::new(SpellId(10), "Might", 2000).with_effect(StandingEffect {
            stat: StatKind::Strength,
            amount: 12,
            duration_ms: None,
        }))
    }

    fn outcome(owner: u32, target: Option<u32>, spell: Arc<Spell>) -> ActionOutcome {
        ActionOutcome {
            owner: ActorId(owner),
            spell,
            line: SpellLine::new("enhancement"),
            target: target.map(ActorId),
            ability: None,
            started_at: Tick::ZERO,
            completed_at: Tick(2000),
        }
    }

    #[test]
    fn completed_buff_applies_on_pipeline_tick() {
        let mut pipeline = EffectPipeline::new();
        pipeline.attach(ActorId(1));

        assert!(pipeline.on_outcome(&outcome(1, None, buff()), Tick(2000)));
        assert_eq!(pipeline.bonus(ActorId(1), StatKind::Strength), 0);

        let events = pipeline.tick(Tick(2000));
        assert!(matches!(events[..], [EffectEvent::Applied { amount: 12, .. }]));
        assert_eq!(pipeline.bonus(ActorId(1), StatKind::Strength), 12);
    }

    #[test]
    fn second_application_is_resisted() {
        let mut pipeline = EffectPipeline::new();
        pipeline.attach(ActorId(1));
        pipeline.attach(ActorId(2));

        pipeline.on_outcome(&outcome(1, Some(2), buff()), Tick(0));
        pipeline.on_outcome(&outcome(1, Some(2), buff()), Tick(0));
        let events = pipeline.tick(Tick(0));

        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            EffectEvent::Resisted {
                reason: ResistReason::AlreadyPresent,
                ..
            }
        ));
        assert_eq!(pipeline.bonus(ActorId(2), StatKind::Strength), 12);
    }

    #[test]
    fn unknown_target_resists_and_cancel_removes_bonus() {
        let mut pipeline = EffectPipeline::new();
        pipeline.attach(ActorId(1));

        pipeline.on_outcome(&outcome(1, Some(99), buff()), Tick(0));
        pipeline.on_outcome(&outcome(1, None, buff()), Tick(0));
        pipeline.cancel(ActorId(1), SpellId(10));
        pipeline.cancel(ActorId(1), SpellId(10));
        let events = pipeline.tick(Tick(0));

        assert!(matches!(
            events[0],
            EffectEvent::Resisted {
                reason: ResistReason::NoTarget,
                ..
            }
        ));
        assert!(matches!(events[2], EffectEvent::Cancelled { .. }));
        assert!(matches!(events[3], EffectEvent::CancelFailed { .. }));
        assert_eq!(pipeline.bonus(ActorId(1), StatKind::Strength), 0);
    }

    #[test]
    fn spells_without_effect_are_ignored() {
        let mut pipeline = EffectPipeline::new();
        let bolt = Arc::new(Spell::new(SpellId(1), "Bolt", 0));
        assert!(!pipeline.on_outcome(&outcome(1, None, bolt), Tick(0)));
        assert_eq!(pipeline.pending(), 0);
    }
}
