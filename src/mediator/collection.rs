//! Per-entity buffer of events awaiting publication.

use super::dispatch::Mediator;
use super::event::Event;
use std::mem;
use std::sync::Arc;
use tracing::error;

/// Events recorded by one entity, raised through a mediator exactly once.
///
/// Contexts append to it while committing transitions; the host raises it
/// after the entity's changes are durable.
#[derive(Debug, Default)]
pub struct EventCollection {
    events: Vec<Arc<dyn Event>>,
    raised: bool,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<E: Event>(&mut self, event: E) {
        self.push(Arc::new(event));
    }

    /// Append an already shared event. Dropped (and logged) once raised.
    pub fn push(&mut self, event: Arc<dyn Event>) {
        if self.raised {
            error!(kind = %event.kind(), ?event, "failed to add event, already raised");
            return;
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Event>> {
        self.events.iter()
    }

    /// Dispatch every buffered event through `mediator`, in insertion order.
    ///
    /// Only the first call dispatches; later calls are logged and ignored.
    /// Returns the number of events dispatched.
    pub async fn raise<M>(&mut self, mediator: &M) -> usize
    where
        M: Mediator + ?Sized,
    {
        if self.raised {
            error!(pending = self.events.len(), "failed to raise events, already raised");
            return 0;
        }
        self.raised = true;

        let events = mem::take(&mut self.events);
        let count = events.len();
        for event in events {
            mediator.dispatch(event).await;
        }
        count
    }
}
