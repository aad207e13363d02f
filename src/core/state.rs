//! The State and StateContext protocol.
//!
//! A context (the host entity) exclusively owns its current state. The state
//! keeps a non-owning [`ContextRef`] naming the entity it belongs to, and the
//! machine drives both through the two traits below.

use super::error::FsmError;
use super::label::{Action, StateLabel};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// Type-erasure helpers for checked downcasts of state and event objects.
///
/// Implemented for every `Any + Send + Sync` type; never implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// Non-owning back-reference from a state to the context that owns it.
///
/// It identifies the owning entity; state-specific logic that needs the
/// entity's data receives it as an explicit argument from the entity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextRef {
    id: Arc<str>,
}

impl ContextRef {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextRef").field(&&*self.id).finish()
    }
}

/// Minimal capability set every state object provides.
///
/// Host variants usually extend this trait with their own domain operations
/// and are stored by the context as `Box<dyn HostState>`.
pub trait State: AsAny {
    fn label(&self) -> &StateLabel;

    fn context(&self) -> Option<&ContextRef>;

    fn set_context(&mut self, context: ContextRef);
}

/// Capability the owning entity provides to the machine.
pub trait StateContext {
    /// State representation the entity stores, typically `dyn HostState`.
    type State: State + ?Sized;

    fn current_state(&self) -> &Self::State;

    /// Commit a transition to `next`, triggered by `by`.
    ///
    /// Implementations swap their current state, point the new state's
    /// context back at themselves and usually record a transition event.
    /// Any error returned here is propagated unchanged to the caller of
    /// [`StateMachine::transition_to_next`](crate::machine::StateMachine::transition_to_next).
    fn transition_to(&mut self, next: Box<Self::State>, by: &Action) -> Result<(), FsmError>;
}

/// State with no behaviour beyond its label and context reference.
///
/// Sufficient for terminal states, and the usual base embedded in host
/// states via [`delegate_state!`](crate::delegate_state).
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleState {
    label: StateLabel,
    context: Option<ContextRef>,
}

impl SimpleState {
    pub fn new(label: impl Into<StateLabel>) -> Self {
        Self {
            label: label.into(),
            context: None,
        }
    }
}

impl State for SimpleState {
    fn label(&self) -> &StateLabel {
        &self.label
    }

    fn context(&self) -> Option<&ContextRef> {
        self.context.as_ref()
    }

    fn set_context(&mut self, context: ContextRef) {
        self.context = Some(context);
    }
}

/// Checked downcast of a boxed state to a concrete state type.
///
/// Fails with [`FsmError::StateMismatch`] when the state is of another type.
pub fn downcast_state<T, S>(state: Box<S>) -> Result<Box<T>, FsmError>
where
    T: State,
    S: State + ?Sized,
{
    let label = state.label().clone();
    AsAny::into_any(state)
        .downcast::<T>()
        .map_err(|_| FsmError::StateMismatch {
            label,
            expected: type_name::<T>(),
        })
}

/// Borrowing counterpart of [`downcast_state`].
pub fn downcast_state_ref<T, S>(state: &S) -> Option<&T>
where
    T: State,
    S: State + ?Sized,
{
    AsAny::as_any(state).downcast_ref::<T>()
}

/// Mutable counterpart of [`downcast_state`].
pub fn downcast_state_mut<T, S>(state: &mut S) -> Option<&mut T>
where
    T: State,
    S: State + ?Sized,
{
    AsAny::as_any_mut(state).downcast_mut::<T>()
}
