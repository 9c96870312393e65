//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BrainEvent, CastingEvent, EffectEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Admission, completion and interruption of actions
    Casting,
    /// Behavior state transitions
    Brain,
    /// Standing effects applied or removed
    Effects,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Casting, Topic::Brain, Topic::Effects];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Casting(CastingEvent),
    Brain(BrainEvent),
    Effects(EffectEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Casting(_) => Topic::Casting,
            Event::Brain(_) => Topic::Brain,
            Event::Effects(_) => Topic::Effects,
        }
    }
}

impl From<CastingEvent> for Event {
    fn from(event: CastingEvent) -> Self {
        Event::Casting(event)
    }
}

impl From<BrainEvent> for Event {
    fn from(event: BrainEvent) -> Self {
        Event::Brain(event)
    }
}

impl From<EffectEvent> for Event {
    fn from(event: EffectEvent) -> Self {
        Event::Effects(event)
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Publishing is best-effort and never blocks the simulation loop.
#[derive(Clone)]
pub struct EventBus {
    casting: broadcast::Sender<Event>,
    brain: broadcast::Sender<Event>,
    effects: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            casting: broadcast::channel(capacity).0,
            brain: broadcast::channel(capacity).0,
            effects: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Casting => &self.casting,
            Topic::Brain => &self.brain,
            Topic::Effects => &self.effects,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use sim_core::{ActorId, Tick};

    use super::*;

    #[test]
    fn events_only_reach_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut casting = bus.subscribe(Topic::Casting);
        let mut brain = bus.subscribe(Topic::Brain);

        bus.publish(CastingEvent::Released {
            actor: ActorId(1),
            at: Tick(50),
        });

        assert!(matches!(
            casting.try_recv(),
            Ok(Event::Casting(CastingEvent::Released { .. }))
        ));
        assert!(brain.try_recv().is_err());
    }
}
