//! Publication of domain events.
//!
//! Contexts record events (such as [`StateTransitioned`]) into their
//! [`EventCollection`] while committing transitions; the host later raises
//! the collection through a [`Mediator`], which fans each event out to the
//! handlers subscribed to its kind. The state machine itself never
//! dispatches.

mod collection;
mod config;
mod dispatch;
mod event;

pub use collection::EventCollection;
pub use config::MediatorConfig;
pub use dispatch::{EventHandler, InMemMediator, Mediator, OrphanEventHandler};
pub use event::{Event, EventKind, StateTransitioned};
