use std::fmt;

/// Identifier of a spell definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u32);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spell:{}", self.0)
    }
}

/// Identifier of an ability (style, realm ability, item use...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// Named collection a spell is cast from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellLine(pub String);

impl SpellLine {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpellLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared resource an action occupies for its whole duration (an instrument
/// for songs). Actors that enforce exclusivity cannot start another
/// non-instant action while one holding a class is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusivityClass(pub u16);

/// Stats a standing effect can modify.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Strength,
    Constitution,
    Dexterity,
    Quickness,
    ArmorFactor,
    MaxHealth,
}

/// A stat bonus a completed spell leaves on its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandingEffect {
    pub stat: StatKind,
    pub amount: i32,
    /// `None` keeps the effect until it is cancelled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration_ms: Option<u64>,
}

/// Static spell definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    /// Cast time in milliseconds; `0` is an instant cast.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time_ms: u64,
    /// Focus spells are maintained by the caster and may be preempted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub focus: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_interruptible"))]
    pub interruptible: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_target: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclusivity: Option<ExclusivityClass>,
    /// Chamber-style actions never trip exclusivity checks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exempt_from_exclusivity: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<StandingEffect>,
}

#[cfg(feature = "serde")]
fn default_interruptible() -> bool {
    true
}

impl Spell {
    /// Creates an interruptible spell with no special properties.
    pub fn new(id: SpellId, name: impl Into<String>, cast_time_ms: u64) -> Self {
        Self {
            id,
            name: name.into(),
            cast_time_ms,
            focus: false,
            interruptible: true,
            requires_target: false,
            exclusivity: None,
            exempt_from_exclusivity: false,
            effect: None,
        }
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        self.cast_time_ms == 0
    }

    #[must_use]
    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    #[must_use]
    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }

    #[must_use]
    pub fn targeted(mut self) -> Self {
        self.requires_target = true;
        self
    }

    #[must_use]
    pub fn with_exclusivity(mut self, class: ExclusivityClass) -> Self {
        self.exclusivity = Some(class);
        self
    }

    #[must_use]
    pub fn exempt(mut self) -> Self {
        self.exempt_from_exclusivity = true;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: StandingEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}
