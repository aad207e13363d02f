//! Events and the built-in transition event.

use crate::core::{Action, AsAny, StateLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

identifier! {
    /// Kind used to route an event to its handlers.
    pub struct EventKind;
}

/// Something that happened to an entity, published after the fact.
///
/// # Example
///
/// ```rust
/// use statecraft::mediator::{Event, EventKind};
///
/// #[derive(Debug)]
/// struct Shipped {
///     order_id: String,
/// }
///
/// impl Event for Shipped {
///     fn kind(&self) -> EventKind {
///         EventKind::from_static("order.shipped")
///     }
/// }
///
/// let event = Shipped { order_id: "o-1".to_string() };
/// assert_eq!(event.kind(), "order.shipped");
/// ```
pub trait Event: AsAny + Debug {
    /// Routing key; handlers subscribe by kind.
    fn kind(&self) -> EventKind;
}

impl dyn Event {
    /// Checked downcast to a concrete event type.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }
}

/// Recorded by a context when it commits a transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransitioned {
    /// Unique per recorded transition.
    pub id: Uuid,
    pub from: StateLabel,
    pub to: StateLabel,
    /// Action that triggered the transition.
    pub action: Action,
    /// Id of the entity that moved, as carried by its [`ContextRef`](crate::core::ContextRef).
    pub entity_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl StateTransitioned {
    /// Kind every `StateTransitioned` is published under.
    pub const KIND: EventKind = EventKind::from_static("fsm.state_transitioned");

    /// Record a transition that just happened, with a fresh id and the
    /// current time.
    ///
    /// ```rust
    /// use statecraft::core::{Action, StateLabel};
    /// use statecraft::mediator::StateTransitioned;
    ///
    /// let event = StateTransitioned::new(
    ///     StateLabel::from_static("pending"),
    ///     StateLabel::from_static("checked_out"),
    ///     Action::from_static("ADD"),
    ///     "cart-1",
    /// );
    /// assert_eq!(event.entity_id, "cart-1");
    /// assert!(event.to_json().unwrap().contains("\"to\":\"checked_out\""));
    /// ```
    pub fn new(from: StateLabel, to: StateLabel, action: Action, entity_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            action,
            entity_id: entity_id.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Encode as a JSON object with labels as plain strings.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Event for StateTransitioned {
    fn kind(&self) -> EventKind {
        Self::KIND
    }
}
