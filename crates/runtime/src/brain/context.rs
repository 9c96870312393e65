//! Blackboard shared by all brain states of one actor.

use std::sync::Arc;

use tracing::trace;

use sim_core::{ActorId, BrainTuning, GroupView, HostilityTable, RngOracle, Tick, compute_seed};

use super::Body;
use crate::casting::{CastingDirectory, CastingHandle};

/// Combat disposition of a brain.
///
/// Re-initialized every time the actor wakes up after death.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrainSettings {
    /// Chance in percent that a visible hostile is added to the table.
    pub aggro_level: u8,
    pub aggro_range: u32,
    pub pvp_mode: bool,
    pub roam: bool,
    pub defend: bool,
    pub roaming_range: u32,
    /// Never pick fights; hostility only comes from being attacked.
    pub prevent_combat: bool,
}

impl BrainSettings {
    pub fn from_tuning(tuning: &BrainTuning) -> Self {
        Self {
            aggro_level: tuning.initial_aggro_level,
            aggro_range: tuning.wide_aggro_range,
            pvp_mode: false,
            roam: true,
            defend: false,
            roaming_range: tuning.visibility_distance,
            prevent_combat: false,
        }
    }
}

/// Per-actor context handed to every state hook and transition predicate.
pub struct BrainContext {
    pub body: Arc<dyn Body>,
    pub casting: CastingHandle,
    pub directory: CastingDirectory,
    pub hostility: HostilityTable,
    pub settings: BrainSettings,
    pub tuning: BrainTuning,
    /// Game time of the tick being evaluated.
    pub now: Tick,
    /// Set on creation and on death; cleared by the wake-up state once it
    /// has re-initialized the settings.
    pub needs_init: bool,
    rng: Arc<dyn RngOracle>,
    seed: u64,
    rolls: u32,
}

impl BrainContext {
    pub fn new(
        body: Arc<dyn Body>,
        casting: CastingHandle,
        directory: CastingDirectory,
        tuning: BrainTuning,
        rng: Arc<dyn RngOracle>,
        seed: u64,
    ) -> Self {
        Self {
            body,
            casting,
            directory,
            hostility: HostilityTable::new(),
            settings: BrainSettings::from_tuning(&tuning),
            tuning,
            now: Tick::ZERO,
            needs_init: true,
            rng,
            seed,
            rolls: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ActorId {
        self.body.id()
    }

    pub fn group(&self) -> Option<GroupView> {
        self.body.group()
    }

    pub fn is_group_leader(&self) -> bool {
        self.group().is_some_and(|group| group.is_leader(self.id()))
    }

    pub fn has_aggro(&self) -> bool {
        !self.hostility.is_empty()
    }

    /// Advances the roll counter when the clock moves.
    pub(crate) fn begin_tick(&mut self, now: Tick) {
        if now != self.now {
            self.rolls = 0;
        }
        self.now = now;
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.seed, self.now.0, self.id().0, self.rolls);
        self.rolls = self.rolls.wrapping_add(1);
        seed
    }

    pub fn roll_chance(&mut self, percent: u8) -> bool {
        let seed = self.next_seed();
        self.rng.chance(seed, percent)
    }

    pub fn jitter(&mut self, radius: i32) -> i32 {
        let seed = self.next_seed();
        self.rng.jitter(seed, radius)
    }

    /// Adds visible hostiles within the current aggro range to the table and
    /// reports whether there is anything to fight.
    pub fn check_proximity_aggro(&mut self) -> bool {
        if self.settings.aggro_level > 0 {
            for hostile in self.body.hostiles_within(self.settings.aggro_range) {
                if self.hostility.contains(hostile) {
                    continue;
                }
                if self.settings.aggro_level >= 100 || self.roll_chance(self.settings.aggro_level)
                {
                    trace!(target: "runtime::brain", actor = %self.id(), %hostile, "proximity aggro");
                    self.hostility.add(hostile, 1);
                }
            }
        }
        self.has_aggro()
    }

    pub fn is_beyond_tether(&self) -> bool {
        self.body.tether_range().is_some_and(|range| {
            !self
                .body
                .position()
                .within(&self.body.spawn_point(), range)
        })
    }

    /// Whether any other group member currently has an active cast.
    pub fn group_is_casting(&self) -> bool {
        self.group()
            .is_some_and(|group| self.directory.any_casting(&group.members, self.id()))
    }

    pub fn clear_hostility(&mut self) {
        self.hostility.clear();
    }

    /// Casts the body's preferred defensive spell, if it has one.
    pub fn cast_defensive(&self) -> bool {
        if self.casting.is_casting() {
            return false;
        }
        match self.body.defensive_spell() {
            Some(choice) => self.casting.request_cast(choice.into_request()),
            None => false,
        }
    }

    pub fn check_defensive_abilities(&self) {
        for ability in self.body.defensive_abilities() {
            self.casting.request_ability(ability);
        }
    }

    pub fn check_offensive_abilities(&self) {
        for ability in self.body.offensive_abilities() {
            self.casting.request_ability(ability);
        }
    }

    /// Attacks the most hated actor and casts at it when possible.
    pub fn attack_most_hated(&self) {
        let Some(target) = self.hostility.most_hated() else {
            return;
        };
        self.body.attack(target);
        if !self.casting.is_casting()
            && let Some(choice) = self.body.offensive_spell(target)
        {
            self.casting.request_cast(choice.at(target).into_request());
        }
    }

    /// Sits down to recover below the rest threshold, stands up otherwise.
    /// Only applies while stationary and out of combat; a defensive cast
    /// takes precedence.
    pub fn rest_or_recover(&self) {
        if self.body.is_moving() || self.body.in_combat() {
            return;
        }
        if self.cast_defensive() {
            return;
        }
        let resting = self
            .body
            .resources()
            .any_below(self.tuning.rest_threshold_percent);
        if resting != self.body.is_sitting() {
            self.body.sit(resting);
        }
    }
}

impl std::fmt::Debug for BrainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrainContext")
            .field("actor", &self.id())
            .field("now", &self.now)
            .field("settings", &self.settings)
            .field("hostility", &self.hostility)
            .finish_non_exhaustive()
    }
}
