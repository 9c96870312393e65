use bitflags::bitflags;

bitflags! {
    /// Crowd-control and restriction bits read from an actor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        const STUNNED       = 1 << 0;
        const MEZZED        = 1 << 1;
        const SILENCED      = 1 << 2;
        const INCAPACITATED = 1 << 3;
    }
}

impl StatusFlags {
    /// Bits that count as crowd control. A cast request under crowd control
    /// produces a cast-failed notification; silence is refused quietly.
    pub const CROWD_CONTROL: Self = Self::STUNNED
        .union(Self::MEZZED)
        .union(Self::INCAPACITATED);

    /// Bits that forbid starting a cast.
    pub const NO_CASTING: Self = Self::CROWD_CONTROL.union(Self::SILENCED);

    #[inline]
    pub fn can_cast(self) -> bool {
        !self.intersects(Self::NO_CASTING)
    }

    #[inline]
    pub fn is_crowd_controlled(self) -> bool {
        self.intersects(Self::CROWD_CONTROL)
    }

    /// Stunned or mezzed actors cannot decide to leave combat.
    #[inline]
    pub fn is_stunned_or_mezzed(self) -> bool {
        self.intersects(Self::STUNNED | Self::MEZZED)
    }
}
