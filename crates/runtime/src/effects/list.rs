use std::collections::BTreeMap;

use sim_core::{ActorId, SpellId, StandingEffect, StatKind, Tick};

/// A standing effect attached to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInstance {
    pub caster: ActorId,
    pub owner: ActorId,
    pub spell: SpellId,
    pub effect: StandingEffect,
    pub applied_at: Tick,
    pub expires_at: Option<Tick>,
}

impl EffectInstance {
    pub fn new(
        caster: ActorId,
        owner: ActorId,
        spell: SpellId,
        effect: StandingEffect,
        now: Tick,
    ) -> Self {
        Self {
            caster,
            owner,
            spell,
            effect,
            applied_at: now,
            expires_at: effect.duration_ms.map(|duration| now + duration),
        }
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Effects on one actor plus the summed stat bonuses they grant.
///
/// At most one instance per spell.
#[derive(Debug, Clone, Default)]
pub struct EffectList {
    effects: BTreeMap<SpellId, EffectInstance>,
    bonuses: BTreeMap<StatKind, i32>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, spell: SpellId) -> bool {
        self.effects.contains_key(&spell)
    }

    /// Adds the instance and its bonus. Returns `false` if the spell is
    /// already present.
    pub fn add(&mut self, instance: EffectInstance) -> bool {
        if self.effects.contains_key(&instance.spell) {
            return false;
        }
        *self.bonuses.entry(instance.effect.stat).or_insert(0) += instance.effect.amount;
        self.effects.insert(instance.spell, instance);
        true
    }

    /// Removes the instance and takes its bonus back.
    pub fn remove(&mut self, spell: SpellId) -> Option<EffectInstance> {
        let instance = self.effects.remove(&spell)?;
        let stat = instance.effect.stat;
        if let Some(total) = self.bonuses.get_mut(&stat) {
            *total -= instance.effect.amount;
            if *total == 0 {
                self.bonuses.remove(&stat);
            }
        }
        Some(instance)
    }

    pub fn expired(&self, now: Tick) -> Vec<SpellId> {
        self.effects
            .values()
            .filter(|instance| instance.is_expired(now))
            .map(|instance| instance.spell)
            .collect()
    }

    pub fn bonus(&self, stat: StatKind) -> i32 {
        self.bonuses.get(&stat).copied().unwrap_or(0)
    }

    pub fn bonuses(&self) -> &BTreeMap<StatKind, i32> {
        &self.bonuses
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
