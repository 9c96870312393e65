use super::{ActorId, Position};

/// Snapshot of the group an actor belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupView {
    /// Current living leader.
    pub leader: ActorId,
    /// Camp point the group holds, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub camp_point: Option<Position>,
    /// All members, leader included.
    pub members: Vec<ActorId>,
}

impl GroupView {
    pub fn new(leader: ActorId, members: Vec<ActorId>) -> Self {
        Self {
            leader,
            camp_point: None,
            members,
        }
    }

    #[must_use]
    pub fn with_camp_point(mut self, camp_point: Position) -> Self {
        self.camp_point = Some(camp_point);
        self
    }

    #[inline]
    pub fn is_leader(&self, actor: ActorId) -> bool {
        self.leader == actor
    }
}
