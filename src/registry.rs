//! Named lookup of state machines.
//!
//! A [`MachineRegistry`] lets states and contexts that hold no machine
//! reference ask "the machine called X" for transitions. Build one at
//! application bootstrap and pass it where needed; the process-wide default
//! behind [`register_machine`] / [`must_get_machine`] is a convenience for
//! the composition root.

use crate::core::StateContext;
use crate::machine::StateMachine;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type ErasedMachine = Arc<dyn Any + Send + Sync>;

/// Registry of machines keyed by [`StateMachine::name`].
///
/// Machines for different context types can share one registry; lookups are
/// typed and a machine registered for another context type is not found.
#[derive(Default)]
pub struct MachineRegistry {
    machines: RwLock<HashMap<String, ErasedMachine>>,
}

impl MachineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `machine` under its name, replacing any machine already there.
    pub fn register<C>(&self, machine: Arc<StateMachine<C>>)
    where
        C: StateContext + 'static,
    {
        let name = machine.name().to_string();
        if self.machines.write().insert(name.clone(), machine).is_some() {
            warn!(machine = %name, "replaced previously registered state machine");
        } else {
            debug!(machine = %name, "registered state machine");
        }
    }

    /// Look up the machine registered under `name` for context type `C`.
    ///
    /// Returns `None` when nothing is registered under `name` or when the
    /// machine there drives another context type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{Action, FsmError, SimpleState, StateContext};
    /// use statecraft::machine::StateMachine;
    /// use statecraft::registry::MachineRegistry;
    /// use std::sync::Arc;
    ///
    /// struct Ticket {
    ///     state: Box<SimpleState>,
    /// }
    ///
    /// impl StateContext for Ticket {
    ///     type State = SimpleState;
    ///
    ///     fn current_state(&self) -> &SimpleState {
    ///         &self.state
    ///     }
    ///
    ///     fn transition_to(&mut self, next: Box<SimpleState>, _: &Action) -> Result<(), FsmError> {
    ///         self.state = next;
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let registry = MachineRegistry::new();
    /// registry.register(Arc::new(StateMachine::<Ticket>::new("tickets")));
    ///
    /// assert!(registry.get::<Ticket>("tickets").is_some());
    /// assert!(registry.get::<Ticket>("orders").is_none());
    /// ```
    pub fn get<C>(&self, name: &str) -> Option<Arc<StateMachine<C>>>
    where
        C: StateContext + 'static,
    {
        let machine = self.machines.read().get(name).cloned()?;
        machine.downcast::<StateMachine<C>>().ok()
    }

    /// Look up a machine whose presence is an invariant of program wiring.
    ///
    /// # Panics
    ///
    /// Panics if no machine for context type `C` is registered under `name`;
    /// the message says whether the name is unknown or bound to another
    /// context type. Never use this for lookups driven by user input.
    pub fn must_get<C>(&self, name: &str) -> Arc<StateMachine<C>>
    where
        C: StateContext + 'static,
    {
        match self.get(name) {
            Some(machine) => machine,
            None if self.contains(name) => panic!(
                "state machine {name} is registered for another context type, not {}",
                type_name::<C>()
            ),
            None => panic!("state machine {name} not found"),
        }
    }

    /// Whether any machine, of any context type, is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.machines.read().contains_key(name)
    }

    /// Remove the machine registered under `name`. Returns whether one was
    /// there.
    pub fn remove(&self, name: &str) -> bool {
        self.machines.write().remove(name).is_some()
    }

    /// Drop every registration, e.g. at application teardown.
    pub fn clear(&self) {
        self.machines.write().clear();
    }

    /// Number of registered machines.
    pub fn len(&self) -> usize {
        self.machines.read().len()
    }

    /// Whether no machine is registered.
    pub fn is_empty(&self) -> bool {
        self.machines.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.machines.read().keys().cloned().collect();
        names.sort();
        names
    }
}

static DEFAULT_REGISTRY: Lazy<MachineRegistry> = Lazy::new(MachineRegistry::new);

/// The process-wide default registry.
pub fn global() -> &'static MachineRegistry {
    &DEFAULT_REGISTRY
}

/// Register `machine` in the default registry, replacing any machine of
/// the same name.
pub fn register_machine<C>(machine: Arc<StateMachine<C>>)
where
    C: StateContext + 'static,
{
    global().register(machine);
}

/// Look up a machine in the default registry.
pub fn get_machine<C>(name: &str) -> Option<Arc<StateMachine<C>>>
where
    C: StateContext + 'static,
{
    global().get(name)
}

/// Look up a machine in the default registry whose presence is an
/// invariant of program wiring.
///
/// # Panics
///
/// Panics if the default registry holds no such machine; see
/// [`MachineRegistry::must_get`].
pub fn must_get_machine<C>(name: &str) -> Arc<StateMachine<C>>
where
    C: StateContext + 'static,
{
    global().must_get(name)
}

/// Drop every machine from the default registry.
///
/// Meant for application teardown. Machines already handed out stay alive
/// through their `Arc`s but are no longer found by name.
pub fn clear_machines() {
    global().clear();
}
