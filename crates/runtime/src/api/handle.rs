//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! attaching actors, stepping the simulation or streaming events from
//! specific topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use sim_core::{Actor, ActorId, SpellId, Tick};

use super::errors::{Result, RuntimeError};
use crate::brain::{Body, BrainHook};
use crate::casting::CastingHandle;
use crate::events::{Event, EventBus, Topic};
use crate::workers::{ActorSnapshot, Command};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Attach an actor driven from outside (a player connection).
    ///
    /// The returned handle is the producer side of the actor's casting
    /// queue and may be moved to any thread. Attaching an id twice fails
    /// with [`RuntimeError::AlreadyAttached`].
    pub async fn attach(&self, actor: Arc<dyn Actor>) -> Result<CastingHandle> {
        self.request(|reply| Command::Attach { actor, reply }).await?
    }

    /// Attach an autonomous actor with a brain and optional content hooks.
    pub async fn attach_brain<B>(
        &self,
        body: Arc<B>,
        hooks: Vec<Arc<dyn BrainHook>>,
    ) -> Result<CastingHandle>
    where
        B: Body + 'static,
    {
        let actor: Arc<dyn Actor> = Arc::clone(&body) as Arc<dyn Actor>;
        let body: Arc<dyn Body> = body;
        self.request(|reply| Command::AttachBrain {
            actor,
            body,
            hooks,
            reply,
        })
        .await?
    }

    /// Remove an actor. Returns false if it was not attached.
    pub async fn detach(&self, actor: ActorId) -> Result<bool> {
        self.request(|reply| Command::Detach { actor, reply }).await
    }

    /// Advance the simulation by `ticks` intervals and return the new time.
    pub async fn step(&self, ticks: u32) -> Result<Tick> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    /// Current game time.
    pub async fn now(&self) -> Result<Tick> {
        self.request(|reply| Command::Now { reply }).await
    }

    /// Interrupt the actor's active action.
    ///
    /// Returns false if the active action is uninterruptible or there was
    /// nothing to interrupt.
    pub async fn interrupt(&self, actor: ActorId) -> Result<bool> {
        self.request(|reply| Command::Interrupt { actor, reply })
            .await?
    }

    /// Deliver the death signal to an actor.
    pub async fn kill(&self, actor: ActorId) -> Result<()> {
        self.request(|reply| Command::Kill { actor, reply }).await?
    }

    /// Deliver the revival signal. Returns false if the actor was not dead.
    pub async fn revive(&self, actor: ActorId) -> Result<bool> {
        self.request(|reply| Command::Revive { actor, reply }).await?
    }

    /// Record that `attacker` hurt `actor`.
    pub async fn add_hostility(&self, actor: ActorId, attacker: ActorId, amount: u64) -> Result<()> {
        self.request(|reply| Command::AddHostility {
            actor,
            attacker,
            amount,
            reply,
        })
        .await?
    }

    /// Queue removal of a standing effect; it is applied on the next step.
    pub async fn cancel_effect(&self, owner: ActorId, spell: SpellId) -> Result<()> {
        self.request(|reply| Command::CancelEffect {
            owner,
            spell,
            reply,
        })
        .await
    }

    /// Query one actor's runtime state (read-only snapshot)
    pub async fn query_actor(&self, actor: ActorId) -> Result<Option<ActorSnapshot>> {
        self.request(|reply| Command::QueryActor { actor, reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Casting` - admissions, completions, interrupts
    /// - `Topic::Brain` - behavior state transitions and deaths
    /// - `Topic::Effects` - standing effects applied, resisted or removed
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut casting_rx = handle.subscribe(Topic::Casting);
    /// while let Ok(event) = casting_rx.recv().await {
    ///     // Handle casting events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
