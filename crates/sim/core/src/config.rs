/// What happens when a non-instant request arrives while a focus action is
/// being maintained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FocusPolicy {
    /// The new action replaces the focus action.
    #[default]
    Preempt,
    /// The focus action is treated like any other active action.
    Queue,
}

/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Game time that elapses per simulation tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// Focus preemption policy for the casting scheduler.
    pub focus_policy: FocusPolicy,
    /// Behavior layer tunables.
    pub brain: BrainTuning,
}

impl SimConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

    pub fn new() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            focus_policy: FocusPolicy::default(),
            brain: BrainTuning::default(),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    pub fn with_focus_policy(mut self, focus_policy: FocusPolicy) -> Self {
        self.focus_policy = focus_policy;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers the behavior states read every tick.
///
/// Distances are in world units, durations in milliseconds of game time and
/// chances in percent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainTuning {
    /// Below this health/power/stamina percentage an idle actor rests.
    pub rest_threshold_percent: u8,
    /// How long an actor must be out of combat before it may leave Aggro.
    pub aggro_grace_ms: u64,
    /// Minimum time between two random walks while roaming.
    pub roam_cooldown_ms: u64,
    /// Random-walk chance outside of PvP mode.
    pub random_walk_chance: u8,
    /// Random-walk chance in PvP mode when set to roam.
    pub pvp_roam_chance: u8,
    /// Random-walk chance in PvP mode when set to defend.
    pub pvp_defend_chance: u8,
    /// Aggro range used on wake-up and by followers in PvP mode.
    pub wide_aggro_range: u32,
    /// Aggro range used by followers and outdoor camps.
    pub group_aggro_range: u32,
    /// Aggro range used by camps inside dungeons.
    pub dungeon_camp_aggro_range: u32,
    /// Initial aggro level assigned on wake-up.
    pub initial_aggro_level: u8,
    /// Radius within which observers see animations; also the roaming range.
    pub visibility_distance: u32,
    /// Distance to the spawn point that counts as "home".
    pub near_spawn_radius: u32,
    /// Camp anchor jitter in dungeons.
    pub dungeon_camp_jitter: i32,
    /// Camp anchor jitter outdoors.
    pub outdoor_camp_jitter: i32,
    /// Walking speed used when returning to spawn or camp.
    pub return_speed: u32,
}

impl BrainTuning {
    pub const DEFAULT_REST_THRESHOLD_PERCENT: u8 = 75;
    pub const DEFAULT_AGGRO_GRACE_MS: u64 = 25_000;
    pub const DEFAULT_ROAM_COOLDOWN_MS: u64 = 10_000;
    pub const DEFAULT_RANDOM_WALK_CHANCE: u8 = 20;
    pub const DEFAULT_PVP_ROAM_CHANCE: u8 = 99;
    pub const DEFAULT_PVP_DEFEND_CHANCE: u8 = 20;
    pub const DEFAULT_WIDE_AGGRO_RANGE: u32 = 3600;
    pub const DEFAULT_GROUP_AGGRO_RANGE: u32 = 500;
    pub const DEFAULT_DUNGEON_CAMP_AGGRO_RANGE: u32 = 250;
    pub const DEFAULT_INITIAL_AGGRO_LEVEL: u8 = 100;
    pub const DEFAULT_VISIBILITY_DISTANCE: u32 = 3600;
    pub const DEFAULT_NEAR_SPAWN_RADIUS: u32 = 25;
    pub const DEFAULT_DUNGEON_CAMP_JITTER: i32 = 50;
    pub const DEFAULT_OUTDOOR_CAMP_JITTER: i32 = 100;
    pub const DEFAULT_RETURN_SPEED: u32 = 191;

    pub fn new() -> Self {
        Self {
            rest_threshold_percent: Self::DEFAULT_REST_THRESHOLD_PERCENT,
            aggro_grace_ms: Self::DEFAULT_AGGRO_GRACE_MS,
            roam_cooldown_ms: Self::DEFAULT_ROAM_COOLDOWN_MS,
            random_walk_chance: Self::DEFAULT_RANDOM_WALK_CHANCE,
            pvp_roam_chance: Self::DEFAULT_PVP_ROAM_CHANCE,
            pvp_defend_chance: Self::DEFAULT_PVP_DEFEND_CHANCE,
            wide_aggro_range: Self::DEFAULT_WIDE_AGGRO_RANGE,
            group_aggro_range: Self::DEFAULT_GROUP_AGGRO_RANGE,
            dungeon_camp_aggro_range: Self::DEFAULT_DUNGEON_CAMP_AGGRO_RANGE,
            initial_aggro_level: Self::DEFAULT_INITIAL_AGGRO_LEVEL,
            visibility_distance: Self::DEFAULT_VISIBILITY_DISTANCE,
            near_spawn_radius: Self::DEFAULT_NEAR_SPAWN_RADIUS,
            dungeon_camp_jitter: Self::DEFAULT_DUNGEON_CAMP_JITTER,
            outdoor_camp_jitter: Self::DEFAULT_OUTDOOR_CAMP_JITTER,
            return_speed: Self::DEFAULT_RETURN_SPEED,
        }
    }
}

impl Default for BrainTuning {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tunables() {
        let tuning = BrainTuning::default();
        assert_eq!(tuning.rest_threshold_percent, 75);
        assert_eq!(tuning.aggro_grace_ms, 25_000);
        assert_eq!(tuning.roam_cooldown_ms, 10_000);
        assert_eq!(SimConfig::default().focus_policy, FocusPolicy::Preempt);
    }

    #[test]
    fn test_focus_policy_parses_case_insensitive() {
        assert_eq!("QUEUE".parse::<FocusPolicy>(), Ok(FocusPolicy::Queue));
        assert_eq!(FocusPolicy::Preempt.to_string(), "preempt");
    }
}
