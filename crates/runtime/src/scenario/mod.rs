//! Scripted scenarios for exercising the runtime without a game server.
//!
//! A scenario is a RON document listing spells, groups, actors and a script
//! of timed requests. [`ScenarioRunner`] builds [`SceneActor`]s from it,
//! attaches them to a running runtime and replays the script step by step.

mod actor;
mod runner;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sim_core::{
    ExclusivityClass, Position, ResourceLevels, SimConfig, Spell, SpellId, StandingEffect,
    StatusFlags,
};

use crate::api::{Result, RuntimeError};

pub use actor::{SceneActor, SceneWorld};
pub use runner::ScenarioRunner;

/// Spell definition as written in a scenario file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub cast_time_ms: u64,
    #[serde(default)]
    pub focus: bool,
    #[serde(default = "default_true")]
    pub interruptible: bool,
    #[serde(default)]
    pub requires_target: bool,
    #[serde(default)]
    pub exclusivity: Option<u16>,
    #[serde(default)]
    pub exempt_from_exclusivity: bool,
    #[serde(default)]
    pub effect: Option<StandingEffect>,
}

fn default_true() -> bool {
    true
}

impl SpellSpec {
    pub fn to_spell(&self) -> Spell {
        Spell {
            id: SpellId(self.id),
            name: self.name.clone(),
            cast_time_ms: self.cast_time_ms,
            focus: self.focus,
            interruptible: self.interruptible,
            requires_target: self.requires_target,
            exclusivity: self.exclusivity.map(ExclusivityClass),
            exempt_from_exclusivity: self.exempt_from_exclusivity,
            effect: self.effect,
        }
    }
}

/// Crowd-control bits as named in scenario files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Stunned,
    Mezzed,
    Silenced,
    Incapacitated,
}

impl StatusKind {
    pub fn flags(kinds: &[StatusKind]) -> StatusFlags {
        kinds.iter().fold(StatusFlags::empty(), |flags, kind| {
            flags
                | match kind {
                    StatusKind::Stunned => StatusFlags::STUNNED,
                    StatusKind::Mezzed => StatusFlags::MEZZED,
                    StatusKind::Silenced => StatusFlags::SILENCED,
                    StatusKind::Incapacitated => StatusFlags::INCAPACITATED,
                }
        })
    }
}

/// Content hooks a scripted actor can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookSpec {
    ResetOnDisengage,
    OpportunisticCast { spell: u32, chance: u8 },
}

/// How an actor is driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    /// Requests come from the script only; follow-up casting is enabled.
    Player,
    /// A brain drives the actor.
    #[default]
    Brain,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub control: Control,
    /// Actors of different factions are hostile to each other.
    pub faction: u8,
    pub position: Position,
    #[serde(default)]
    pub heading: u16,
    #[serde(default)]
    pub resources: ResourceLevels,
    #[serde(default)]
    pub can_roam: bool,
    #[serde(default)]
    pub patrol: bool,
    #[serde(default)]
    pub in_dungeon: bool,
    #[serde(default)]
    pub tether: Option<u32>,
    #[serde(default)]
    pub stealthed: bool,
    #[serde(default)]
    pub enforce_exclusivity: bool,
    #[serde(default = "ActorSpec::default_speed")]
    pub max_speed: u32,
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub defensive_spell: Option<u32>,
    #[serde(default)]
    pub offensive_spell: Option<u32>,
    #[serde(default)]
    pub abilities: Vec<u32>,
    #[serde(default)]
    pub hooks: Vec<HookSpec>,
}

impl ActorSpec {
    pub const DEFAULT_SPEED: u32 = 200;

    fn default_speed() -> u32 {
        Self::DEFAULT_SPEED
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub leader: u32,
    pub members: Vec<u32>,
    #[serde(default)]
    pub camp_point: Option<Position>,
}

/// One scripted request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptAction {
    Cast {
        actor: u32,
        spell: u32,
        #[serde(default)]
        target: Option<u32>,
    },
    UseAbility { actor: u32, ability: u32 },
    Interrupt { actor: u32 },
    Kill { actor: u32 },
    Revive { actor: u32 },
    Hostility { actor: u32, attacker: u32, amount: u64 },
    SetStatus { actor: u32, status: Vec<StatusKind> },
    Move { actor: u32, to: Position },
    CancelEffect { owner: u32, spell: u32 },
}

impl ScriptAction {
    fn actors(&self) -> Vec<u32> {
        match self {
            ScriptAction::Cast { actor, target, .. } => {
                let mut ids = vec![*actor];
                ids.extend(target);
                ids
            }
            ScriptAction::Hostility {
                actor, attacker, ..
            } => vec![*actor, *attacker],
            ScriptAction::UseAbility { actor, .. }
            | ScriptAction::Interrupt { actor }
            | ScriptAction::Kill { actor }
            | ScriptAction::Revive { actor }
            | ScriptAction::SetStatus { actor, .. }
            | ScriptAction::Move { actor, .. } => vec![*actor],
            ScriptAction::CancelEffect { owner, .. } => vec![*owner],
        }
    }

    fn spell(&self) -> Option<u32> {
        match self {
            ScriptAction::Cast { spell, .. } | ScriptAction::CancelEffect { spell, .. } => {
                Some(*spell)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Game time at which the action is issued.
    pub at_ms: u64,
    pub action: ScriptAction,
}

/// Scenario configuration for a scripted run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub spells: Vec<SpellSpec>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub script: Vec<ScriptEntry>,
}

impl Scenario {
    /// Load scenario from a RON file.
    ///
    /// The scenario is validated before it is returned.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let scenario: Scenario = ron::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks that every reference resolves.
    pub fn validate(&self) -> Result<()> {
        let mut actors = HashSet::new();
        for actor in &self.actors {
            if !actors.insert(actor.id) {
                return Err(invalid(format!("duplicate actor id {}", actor.id)));
            }
        }

        let mut spells = HashSet::new();
        for spell in &self.spells {
            if !spells.insert(spell.id) {
                return Err(invalid(format!("duplicate spell id {}", spell.id)));
            }
        }

        for actor in &self.actors {
            let referenced = actor
                .defensive_spell
                .iter()
                .chain(&actor.offensive_spell)
                .chain(actor.hooks.iter().filter_map(|hook| match hook {
                    HookSpec::OpportunisticCast { spell, .. } => Some(spell),
                    HookSpec::ResetOnDisengage => None,
                }));
            for spell in referenced {
                if !spells.contains(spell) {
                    return Err(invalid(format!(
                        "actor {} references unknown spell {}",
                        actor.id, spell
                    )));
                }
            }
        }

        for group in &self.groups {
            if !group.members.contains(&group.leader) {
                return Err(invalid(format!(
                    "group leader {} is not a member",
                    group.leader
                )));
            }
            if let Some(missing) = group.members.iter().find(|id| !actors.contains(*id)) {
                return Err(invalid(format!("group member {} does not exist", missing)));
            }
        }

        for entry in &self.script {
            if let Some(missing) = entry.action.actors().into_iter().find(|id| !actors.contains(id)) {
                return Err(invalid(format!(
                    "script entry at {}ms references unknown actor {}",
                    entry.at_ms, missing
                )));
            }
            if let Some(spell) = entry.action.spell()
                && !spells.contains(&spell)
            {
                return Err(invalid(format!(
                    "script entry at {}ms references unknown spell {}",
                    entry.at_ms, spell
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> RuntimeError {
    RuntimeError::InvalidScenario(message)
}
