//! Named, asynchronous pub/sub link between the UI and the backend.
//!
//! Events travel as JSON [`Envelope`]s and are decoded back into
//! [`ChannelEvent`]s on the receiving side before any handler sees them.
//! Each side owns an [`Endpoint`]; subscribers get a [`Subscription`] that
//! yields the events of one name in emission order and unregisters itself
//! when dropped.

use std::sync::{Arc, Mutex, PoisonError};

use api_types::events::{ChannelEvent, EventName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::ChannelError;

/// Wire form of an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn encode(event: &ChannelEvent) -> Result<Self, ChannelError> {
        Ok(serde_json::from_value(serde_json::to_value(event)?)?)
    }

    /// Validates the name and payload and builds the typed event.
    pub fn decode(self) -> Result<ChannelEvent, ChannelError> {
        if EventName::parse(&self.name).is_none() {
            return Err(ChannelError::UnknownEvent(self.name));
        }
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

/// Capability to talk over the event channel.
///
/// Passed to the UI and the backend instead of a global bus, so tests can
/// swap in doubles that control delivery.
pub trait EventChannel: Send + Sync {
    /// Fire-and-forget: returns once the event is queued, not delivered.
    fn emit(&self, event: ChannelEvent) -> Result<(), ChannelError>;

    /// Registers a handler for `name` identified by `key`.
    ///
    /// A `(name, key)` pair can be live only once; registering it again
    /// before the previous subscription is dropped fails.
    fn on(&self, name: EventName, key: &str) -> Result<Subscription, ChannelError>;
}

impl<T: EventChannel + ?Sized> EventChannel for Arc<T> {
    fn emit(&self, event: ChannelEvent) -> Result<(), ChannelError> {
        (**self).emit(event)
    }

    fn on(&self, name: EventName, key: &str) -> Result<Subscription, ChannelError> {
        (**self).on(name, key)
    }
}

struct Handler {
    id: u64,
    name: EventName,
    key: String,
    sender: mpsc::UnboundedSender<ChannelEvent>,
}

#[derive(Default)]
struct HandlerTable {
    next_id: u64,
    handlers: Vec<Handler>,
}

/// Registered handlers of one side of the channel.
#[derive(Clone, Default)]
pub struct Handlers {
    inner: Arc<Mutex<HandlerTable>>,
}

impl Handlers {
    pub fn subscribe(&self, name: EventName, key: &str) -> Result<Subscription, ChannelError> {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if table
            .handlers
            .iter()
            .any(|handler| handler.name == name && handler.key == key)
        {
            return Err(ChannelError::DuplicateSubscription {
                name,
                key: key.to_string(),
            });
        }

        let id = table.next_id;
        table.next_id += 1;
        let (sender, receiver) = mpsc::unbounded_channel();
        table.handlers.push(Handler {
            id,
            name,
            key: key.to_string(),
            sender,
        });
        tracing::debug!("registered handler \"{key}\" for {name}");

        Ok(Subscription {
            id,
            name,
            receiver,
            handlers: self.clone(),
        })
    }

    /// Hands `event` to every handler of its name and returns how many got it.
    pub fn dispatch(&self, event: &ChannelEvent) -> usize {
        let name = event.name();
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        for handler in table.handlers.iter().filter(|handler| handler.name == name) {
            if handler.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of live handlers for `name`.
    pub fn count(&self, name: EventName) -> usize {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .handlers
            .iter()
            .filter(|handler| handler.name == name)
            .count()
    }

    fn remove(&self, id: u64) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table.handlers.retain(|handler| handler.id != id);
    }
}

/// A live registration. Events arrive FIFO; dropping it unregisters.
pub struct Subscription {
    id: u64,
    name: EventName,
    receiver: mpsc::UnboundedReceiver<ChannelEvent>,
    handlers: Handlers,
}

impl Subscription {
    pub fn name(&self) -> EventName {
        self.name
    }

    /// Waits for the next event.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.receiver.recv().await
    }

    /// Returns the next already delivered event, if any.
    pub fn try_recv(&mut self) -> Option<ChannelEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handlers.remove(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// One side of an in-process event channel.
pub struct Endpoint {
    side: &'static str,
    outbound: mpsc::UnboundedSender<Envelope>,
    handlers: Handlers,
    dispatcher: JoinHandle<()>,
}

impl Endpoint {
    fn spawn(
        side: &'static str,
        outbound: mpsc::UnboundedSender<Envelope>,
        mut inbound: mpsc::UnboundedReceiver<Envelope>,
    ) -> Self {
        let handlers = Handlers::default();
        let table = handlers.clone();

        let dispatcher = tokio::spawn(async move {
            while let Some(envelope) = inbound.recv().await {
                let name = envelope.name.clone();
                match envelope.decode() {
                    Ok(event) => {
                        if table.dispatch(&event) == 0 {
                            tracing::debug!("{side}: no handler for {name}");
                        }
                    }
                    Err(err) => tracing::warn!("{side}: dropping event \"{name}\": {err}"),
                }
            }
            tracing::debug!("{side}: event channel closed");
        });

        Self {
            side,
            outbound,
            handlers,
            dispatcher,
        }
    }

    /// Sends an already encoded envelope, bypassing typed encoding.
    pub fn emit_raw(&self, envelope: Envelope) -> Result<(), ChannelError> {
        self.outbound
            .send(envelope)
            .map_err(|_| ChannelError::Closed)
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }
}

impl EventChannel for Endpoint {
    fn emit(&self, event: ChannelEvent) -> Result<(), ChannelError> {
        tracing::debug!("{}: emit {}", self.side, event.name());
        self.emit_raw(Envelope::encode(&event)?)
    }

    fn on(&self, name: EventName, key: &str) -> Result<Subscription, ChannelError> {
        self.handlers.subscribe(name, key)
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

/// Builds two connected endpoints, `(ui, backend)`.
///
/// Must be called inside a Tokio runtime: each endpoint spawns the task that
/// dispatches its incoming events.
pub fn pair() -> (Endpoint, Endpoint) {
    let (to_backend, from_ui) = mpsc::unbounded_channel();
    let (to_ui, from_backend) = mpsc::unbounded_channel();

    let ui = Endpoint::spawn("ui", to_backend, from_backend);
    let backend = Endpoint::spawn("backend", to_ui, from_ui);
    (ui, backend)
}
