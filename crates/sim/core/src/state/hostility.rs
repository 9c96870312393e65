use std::collections::BTreeMap;

use super::ActorId;

/// Per-actor aggro bookkeeping: who is hostile and how much.
///
/// Ordered by actor id so iteration and tie-breaking are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostilityTable {
    entries: BTreeMap<ActorId, u64>,
}

impl HostilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the hostility held against `actor`.
    pub fn add(&mut self, actor: ActorId, amount: u64) {
        let entry = self.entries.entry(actor).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn remove(&mut self, actor: ActorId) -> Option<u64> {
        self.entries.remove(&actor)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.entries.contains_key(&actor)
    }

    pub fn amount(&self, actor: ActorId) -> u64 {
        self.entries.get(&actor).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The actor with the highest hostility; ties go to the lowest id.
    pub fn most_hated(&self) -> Option<ActorId> {
        self.entries
            .iter()
            .fold(None, |best: Option<(ActorId, u64)>, (&actor, &amount)| {
                match best {
                    Some((_, top)) if top >= amount => best,
                    _ => Some((actor, amount)),
                }
            })
            .map(|(actor, _)| actor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, u64)> + '_ {
        self.entries.iter().map(|(&actor, &amount)| (actor, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_hated_prefers_highest_then_lowest_id() {
        let mut table = HostilityTable::new();
        assert_eq!(table.most_hated(), None);

        table.add(ActorId(7), 10);
        table.add(ActorId(3), 10);
        table.add(ActorId(9), 5);
        assert_eq!(table.most_hated(), Some(ActorId(3)));

        table.add(ActorId(9), 20);
        assert_eq!(table.most_hated(), Some(ActorId(9)));
        assert_eq!(table.amount(ActorId(9)), 25);
    }

    #[test]
    fn test_clear_empties_table() {
        let mut table = HostilityTable::new();
        table.add(ActorId(1), 1);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
