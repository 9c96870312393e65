use std::fmt;

/// Unique identifier for an actor known to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Game time in milliseconds since the simulation started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Milliseconds elapsed from `earlier` to `self`, clamped at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::AddAssign<u64> for Tick {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// World position in game units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    fn distance_squared(&self, other: &Position) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Straight-line distance, rounded down.
    pub fn distance(&self, other: &Position) -> u32 {
        (self.distance_squared(other) as f64).sqrt() as u32
    }

    /// Returns true if `other` lies within `radius` units (inclusive).
    pub fn within(&self, other: &Position, radius: u32) -> bool {
        let radius = i64::from(radius);
        self.distance_squared(other) <= radius * radius
    }

    /// Returns this position shifted on the ground plane.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z,
        }
    }
}

/// Resource percentages reported by an actor, each in `0..=100`.
///
/// `power` is `None` for actors without a power pool; such actors never
/// rest because of power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLevels {
    pub health: u8,
    pub power: Option<u8>,
    pub stamina: u8,
}

impl ResourceLevels {
    pub const FULL: Self = Self {
        health: 100,
        power: Some(100),
        stamina: 100,
    };

    /// Returns true if any tracked resource is below `threshold` percent.
    pub fn any_below(&self, threshold: u8) -> bool {
        self.health < threshold
            || self.power.is_some_and(|power| power < threshold)
            || self.stamina < threshold
    }
}

impl Default for ResourceLevels {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_is_inclusive() {
        let origin = Position::ORIGIN;
        assert!(origin.within(&Position::new(3, 4, 0), 5));
        assert!(!origin.within(&Position::new(3, 5, 0), 5));
        assert_eq!(origin.distance(&Position::new(3, 4, 0)), 5);
    }

    #[test]
    fn test_resources_without_power_ignore_power() {
        let levels = ResourceLevels {
            health: 90,
            power: None,
            stamina: 80,
        };
        assert!(!levels.any_below(75));
        assert!(
            ResourceLevels {
                power: Some(10),
                ..levels
            }
            .any_below(75)
        );
    }

    #[test]
    fn test_tick_since_saturates() {
        assert_eq!(Tick(100).since(Tick(40)), 60);
        assert_eq!(Tick(40).since(Tick(100)), 0);
    }
}
